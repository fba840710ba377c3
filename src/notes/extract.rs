//! Release-note extraction from pull request descriptions.
//!
//! A description either opts out with `== NO RELEASE NOTE ==`, or carries
//! a `== RELEASE NOTES ==` marker followed by sections:
//!
//! ```text
//! == RELEASE NOTES ==
//!
//! General Changes
//! * Fix a thing
//! * Add another thing that spans
//!   two lines
//!
//! Hive Connector Changes
//! * Improve a third thing
//! ```

use crate::domain::PullRequest;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

/// Section headers accepted without a trailing "Changes", in document order
pub const SECTION_PATTERNS: [&str; 11] = [
    r"^General.*",
    r"^Prestissimo \(Native Execution\)",
    r"^Security",
    r"^JDBC Driver",
    r"^Web UI",
    r".* Connector",
    r"^Verifier",
    r"^Resource Groups",
    r"^SPI",
    r".* Plugin",
    r"^Documentation",
];

const ALL_UPPER_WORDS: [&str; 3] = ["jdbc", "spi", "ui"];

/// A note that could not be parsed; the pull request counts as having none
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    #[error("Bad release notes for PR #{pull_request}: expect section header, found [{line}]")]
    ExpectSectionHeader { pull_request: u64, line: String },

    #[error("Bad release notes for PR #{pull_request}: no release note for section [{section}]")]
    EmptySection { pull_request: u64, section: String },

    #[error("Bad release notes for PR #{pull_request} at [{line}]: release note starts without asterisk (*)")]
    MissingAsterisk { pull_request: u64, line: String },
}

/// One categorized note line of a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNoteItem {
    section: String,
    line: String,
    pull_request: u64,
}

impl ReleaseNoteItem {
    /// `section` is normalized and `line` sentence-cased; `None` for a blank line
    pub fn new(section: &str, line: &str, pull_request: u64) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(ReleaseNoteItem {
            section: format_section(section),
            line: sentence_case(line),
            pull_request,
        })
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn pull_request(&self) -> u64 {
        self.pull_request
    }

    /// The line as a list entry: `indent` spaces, then `marker`
    pub fn formatted(&self, marker: &str, indent: usize) -> String {
        format!("{}{} {}", " ".repeat(indent), marker, self.line)
    }
}

impl fmt::Display for ReleaseNoteItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.section, self.line)
    }
}

/// Capitalize each word; a few abbreviations are written in full capitals
pub fn format_section(section: &str) -> String {
    section
        .split_whitespace()
        .map(|word| {
            if ALL_UPPER_WORDS.contains(&word) {
                word.to_uppercase()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first character and end with a period
pub fn sentence_case(line: &str) -> String {
    let mut sentence = capitalize(line);
    if !sentence.ends_with('.') {
        sentence.push('.');
    }
    sentence
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

enum State {
    ExpectSectionHeader,
    ExpectDashesOrReleaseNote { section: String },
    ExpectLine { section: String, note: String },
}

/// Compiled release-note markers and section rules
pub struct ReleaseNoteExtractor {
    no_release_note: Regex,
    release_note: Regex,
    header: Regex,
    dashes: Regex,
    sections: Vec<Regex>,
    section_prefixes: Vec<Regex>,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ReleaseError::config(format!("Invalid pattern {}: {}", pattern, e)))
}

impl ReleaseNoteExtractor {
    pub fn new() -> Result<Self> {
        Ok(ReleaseNoteExtractor {
            no_release_note: compile(r"(?i)== no release note(?:s)? ==")?,
            release_note: compile(r"(?is)== release note(?:s)? ==\w*(.*)$")?,
            header: compile(r"(?i)^(.*) changes$")?,
            dashes: compile(r"^-+$")?,
            sections: SECTION_PATTERNS
                .iter()
                .map(|pattern| compile(&format!("(?i)^(?:{})$", pattern)))
                .collect::<Result<_>>()?,
            section_prefixes: SECTION_PATTERNS
                .iter()
                .map(|pattern| compile(&format!("(?i){}", pattern)))
                .collect::<Result<_>>()?,
        })
    }

    pub fn has_release_notes_marker(&self, text: &str) -> bool {
        self.release_note.is_match(text)
    }

    pub fn has_no_release_note_marker(&self, text: &str) -> bool {
        self.no_release_note.is_match(text)
    }

    /// Position of `category` in [SECTION_PATTERNS]; unlisted categories come last
    pub fn category_rank(&self, category: &str) -> usize {
        self.sections
            .iter()
            .position(|pattern| pattern.is_match(category))
            .unwrap_or(self.sections.len())
    }

    /// Whether a formatted section contains one of [SECTION_PATTERNS]
    pub fn is_known_section(&self, section: &str) -> bool {
        self.section_prefixes
            .iter()
            .any(|pattern| pattern.is_match(section))
    }

    /// Section named by a header line, if it is one
    fn section(&self, line: &str) -> Option<String> {
        if let Some(captures) = self.header.captures(line) {
            return captures.get(1).map(|m| m.as_str().to_lowercase());
        }
        self.sections
            .iter()
            .any(|pattern| pattern.is_match(line))
            .then(|| line.to_string())
    }

    /// Notes of `pull_request`, or `None` when it has none that can be used.
    ///
    /// An explicit opt-out yields an empty list. Malformed notes are logged.
    pub fn extract(&self, pull_request: &PullRequest) -> Option<Vec<ReleaseNoteItem>> {
        match self.parse(pull_request.id, &pull_request.description) {
            Ok(Some(items)) => Some(items),
            Ok(None) => {
                warn!(
                    "Pull request #{} description does not match release note pattern",
                    pull_request.id
                );
                None
            }
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Parse a description; `Ok(None)` when neither marker is present
    pub fn parse(
        &self,
        pull_request: u64,
        description: &str,
    ) -> std::result::Result<Option<Vec<ReleaseNoteItem>>, NoteError> {
        if self.no_release_note.is_match(description) {
            info!("Pull request #{} has no release note", pull_request);
            return Ok(Some(Vec::new()));
        }

        let text = format!("{}\n", description);
        let body = match self.release_note.captures(&text).and_then(|c| c.get(1)) {
            Some(body) => body.as_str(),
            None => return Ok(None),
        };

        let mut items = Vec::new();
        let mut state = State::ExpectSectionHeader;
        for line in body.split('\n').map(str::trim) {
            state = match state {
                State::ExpectSectionHeader => {
                    if line.is_empty() {
                        State::ExpectSectionHeader
                    } else {
                        let section =
                            self.section(line)
                                .ok_or_else(|| NoteError::ExpectSectionHeader {
                                    pull_request,
                                    line: line.to_string(),
                                })?;
                        State::ExpectDashesOrReleaseNote { section }
                    }
                }
                State::ExpectDashesOrReleaseNote { section } => {
                    if self.dashes.is_match(line) {
                        State::ExpectDashesOrReleaseNote { section }
                    } else if line.is_empty() {
                        return Err(NoteError::EmptySection {
                            pull_request,
                            section,
                        });
                    } else if let Some(note) = line.strip_prefix("* ") {
                        State::ExpectLine {
                            section,
                            note: note.trim().to_string(),
                        }
                    } else {
                        return Err(NoteError::MissingAsterisk {
                            pull_request,
                            line: line.to_string(),
                        });
                    }
                }
                State::ExpectLine { section, mut note } => {
                    if line.is_empty() {
                        items.extend(ReleaseNoteItem::new(&section, &note, pull_request));
                        State::ExpectSectionHeader
                    } else if let Some(next) = line.strip_prefix("* ") {
                        items.extend(ReleaseNoteItem::new(&section, &note, pull_request));
                        State::ExpectLine {
                            section,
                            note: next.trim().to_string(),
                        }
                    } else if let Some(next_section) = self.section(line) {
                        items.extend(ReleaseNoteItem::new(&section, &note, pull_request));
                        State::ExpectDashesOrReleaseNote {
                            section: next_section,
                        }
                    } else {
                        note.push(' ');
                        note.push_str(line);
                        State::ExpectLine { section, note }
                    }
                }
            };
        }

        if let State::ExpectLine { section, note } = state {
            items.extend(ReleaseNoteItem::new(&section, &note, pull_request));
        }
        Ok(Some(items))
    }
}
