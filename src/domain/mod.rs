//! Domain logic - pure release rules independent of git, maven and GitHub

pub mod branch;
pub mod commit;
pub mod manifest;
pub mod tag;
pub mod version;

pub use branch::{release_notes_branch, ReleaseBranch};
pub use commit::{Actor, Commit, PullRequest, User};
pub use manifest::PomFile;
pub use tag::TagSet;
pub use version::{Version, VersionFamily};
