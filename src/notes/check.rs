use crate::error::{ReleaseError, Result};
use crate::notes::extract::{ReleaseNoteExtractor, ReleaseNoteItem, SECTION_PATTERNS};
use tracing::{error, info};

/// Verbs a release note line may start with
pub const VALID_STARTING_VERBS: [&str; 10] = [
    "Fix",
    "Improve",
    "Add",
    "Replace",
    "Rename",
    "Remove",
    "Upgrade",
    "Downgrade",
    "Update",
    "Deprecate",
];

/// Release-note block of the pull request template, before it is filled in
pub const RELEASE_NOTE_TEMPLATE: &str = "== RELEASE NOTES ==

General Changes
* ...
* ...

Hive Connector Changes
* ...
* ...
";

/// Validates the release notes of a single pull request description
pub struct ReleaseNotesChecker {
    extractor: ReleaseNoteExtractor,
}

impl ReleaseNotesChecker {
    pub fn new() -> Result<Self> {
        Ok(ReleaseNotesChecker {
            extractor: ReleaseNoteExtractor::new()?,
        })
    }

    /// Run every check and report all violations together
    pub fn check(&self, description: &str) -> Result<Vec<ReleaseNoteItem>> {
        let mut errors = self.verify_sections(description);

        let notes = self
            .extractor
            .parse(0, description)
            .unwrap_or_else(|e| {
                errors.push(e.to_string());
                None
            });
        match &notes {
            Some(items) => {
                for item in items {
                    errors.extend(self.verify_item(item));
                }
            }
            None => errors.push("Release notes not found".to_string()),
        }

        if !errors.is_empty() {
            for message in &errors {
                error!("{}", message);
            }
            return Err(ReleaseError::InvalidReleaseNotes(errors));
        }

        let items = notes.unwrap_or_default();
        info!(
            "release notes found:\n{}",
            items
                .iter()
                .map(|item| item.formatted("*", 1))
                .collect::<Vec<_>>()
                .join("\n")
        );
        Ok(items)
    }

    /// The description must be edited and carry exactly one kind of marker
    pub fn verify_sections(&self, description: &str) -> Vec<String> {
        let mut errors = Vec::new();
        if normalize(description).contains(&normalize(RELEASE_NOTE_TEMPLATE)) {
            errors.push("The PR description may not contain the release note template.".to_string());
        }
        if self.extractor.has_release_notes_marker(description)
            && self.extractor.has_no_release_note_marker(description)
        {
            errors.push(
                "The PR description must contain only one instance of == RELEASE NOTES == or == NO RELEASE NOTE =="
                    .to_string(),
            );
        }
        errors
    }

    pub fn verify_item(&self, item: &ReleaseNoteItem) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.extractor.is_known_section(item.section()) {
            errors.push(format!(
                "The release note section '{}' must match one of the valid regex patterns: {}",
                item.section(),
                SECTION_PATTERNS.join(",")
            ));
        }
        let line = item.line().to_lowercase();
        if !VALID_STARTING_VERBS
            .iter()
            .any(|verb| line.starts_with(&verb.to_lowercase()))
        {
            errors.push(format!(
                "The release note line '{}' must start with one of the valid verbs: {}",
                item.line(),
                VALID_STARTING_VERBS.join(",")
            ));
        }
        errors
    }
}

/// Trailing whitespace is not significant when matching the template
fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
