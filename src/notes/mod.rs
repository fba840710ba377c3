//! Release notes
//!
//! Notes are written by pull request authors in the description of each
//! pull request. [extract] parses them, [document] assembles them into the
//! published document, [check] validates a single description, and
//! [generate] runs the whole release-notes workflow.

pub mod check;
pub mod document;
pub mod extract;
pub mod generate;

pub use check::ReleaseNotesChecker;
pub use document::ReleaseNotes;
pub use extract::{NoteError, ReleaseNoteExtractor, ReleaseNoteItem};
pub use generate::GenerateReleaseNotes;
