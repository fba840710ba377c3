//! Rendering of the release-notes document and the pull request summary.

use crate::config::ReleaseNotesConfig;
use crate::domain::{Commit, PullRequest, Version};
use crate::error::{ReleaseError, Result};
use crate::notes::extract::{ReleaseNoteExtractor, ReleaseNoteItem};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

const IGNORED_COMMITS: &str =
    r"(?i)\[maven-release-plugin]|add release note(?:s)? for|prepare for next development iteration";

/// Order of notes inside a category, by leading verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeType {
    Fix,
    Improve,
    Add,
    Replace,
    Rename,
    Remove,
    Others,
}

impl ChangeType {
    const PREFIXES: [(&'static str, ChangeType); 6] = [
        ("FIX", ChangeType::Fix),
        ("IMPROVE", ChangeType::Improve),
        ("ADD", ChangeType::Add),
        ("REPLACE", ChangeType::Replace),
        ("RENAME", ChangeType::Rename),
        ("REMOVE", ChangeType::Remove),
    ];

    pub fn of(line: &str) -> ChangeType {
        let upper = line.to_uppercase();
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| upper.starts_with(prefix))
            .map(|(_, change)| *change)
            .unwrap_or(ChangeType::Others)
    }
}

pub fn compare_items(a: &ReleaseNoteItem, b: &ReleaseNoteItem) -> Ordering {
    ChangeType::of(a.line())
        .cmp(&ChangeType::of(b.line()))
        .then_with(|| a.line().cmp(b.line()))
}

pub fn compare_categories(extractor: &ReleaseNoteExtractor, a: &str, b: &str) -> Ordering {
    extractor
        .category_rank(a)
        .cmp(&extractor.category_rank(b))
        .then_with(|| a.cmp(b))
}

/// Notes of every pull request between two releases
pub struct ReleaseNotes<'a> {
    extractor: &'a ReleaseNoteExtractor,
    commits: Vec<Commit>,
    pull_requests: Vec<PullRequest>,
    notes: HashMap<u64, Option<Vec<ReleaseNoteItem>>>,
    names_by_login: HashMap<String, String>,
}

impl<'a> ReleaseNotes<'a> {
    /// Drop release bookkeeping commits, then extract the notes of each
    /// distinct pull request
    pub fn collect(extractor: &'a ReleaseNoteExtractor, commits: Vec<Commit>) -> Result<Self> {
        let ignored = Regex::new(IGNORED_COMMITS)
            .map_err(|e| ReleaseError::config(e.to_string()))?;
        let commits: Vec<Commit> = commits
            .into_iter()
            .filter(|commit| !ignored.is_match(&commit.title))
            .collect();

        let mut seen = HashSet::new();
        let pull_requests: Vec<PullRequest> = commits
            .iter()
            .flat_map(|commit| commit.associated_pull_requests.iter())
            .filter(|pull_request| seen.insert(pull_request.id))
            .cloned()
            .collect();

        let notes = pull_requests
            .iter()
            .map(|pull_request| (pull_request.id, extractor.extract(pull_request)))
            .collect();

        let mut names_by_login = HashMap::new();
        for commit in &commits {
            for pull_request in &commit.associated_pull_requests {
                names_by_login
                    .entry(pull_request.author.login.clone())
                    .or_insert_with(|| commit.author.clone());
            }
        }
        for merger in pull_requests.iter().filter_map(|pr| pr.merged_by.as_ref()) {
            names_by_login
                .entry(merger.login.clone())
                .or_insert_with(|| merger.display_name().to_string());
        }

        Ok(ReleaseNotes {
            extractor,
            commits,
            pull_requests,
            notes,
            names_by_login,
        })
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn pull_requests(&self) -> &[PullRequest] {
        &self.pull_requests
    }

    pub fn notes_of(&self, pull_request: u64) -> Option<&[ReleaseNoteItem]> {
        self.notes
            .get(&pull_request)
            .and_then(|notes| notes.as_deref())
    }

    fn name_of(&self, login: &str) -> String {
        self.names_by_login
            .get(login)
            .cloned()
            .unwrap_or_else(|| login.to_string())
    }

    /// Distinct contributor names, sorted
    pub fn contributors(&self) -> Vec<String> {
        self.names_by_login
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The reStructuredText document published with the release
    pub fn document(&self, version: &Version, config: &ReleaseNotesConfig) -> String {
        let mut document = format!("=============\nRelease {}\n=============\n\n", version);
        document.push_str("**Highlights**\n==============\n\n");
        document.push_str("**Details**\n===========\n\n");

        let mut by_category: HashMap<&str, Vec<&ReleaseNoteItem>> = HashMap::new();
        for pull_request in &self.pull_requests {
            for item in self.notes_of(pull_request.id).unwrap_or_default() {
                by_category.entry(item.section()).or_default().push(item);
            }
        }

        let mut categories: Vec<&str> = by_category.keys().copied().collect();
        categories.sort_by(|a, b| compare_categories(self.extractor, a, b));

        for category in categories {
            let header = format!("{} Changes", category);
            document.push_str(&header);
            document.push('\n');
            document.push_str(&"_".repeat(header.len()));

            let mut items = by_category.remove(category).unwrap_or_default();
            items.sort_by(|a, b| compare_items(a, b));
            for item in items {
                let id = item.pull_request();
                document.push('\n');
                document.push_str(&item.formatted("*", 0));
                document.push_str(&format!(
                    " `#{} <{}>`_",
                    id,
                    config.pull_request_url_for(id)
                ));
            }
            document.push_str("\n\n");
        }

        document.push_str("**Credits**\n===========\n\n");
        document.push_str(&self.contributors().join(", "));
        format!("{}\n", document.trim())
    }

    /// Checklist of pull requests without usable notes and of commits
    /// without a pull request, grouped by author
    pub fn missing_notes(&self) -> String {
        let mut entries: Vec<(String, String)> = Vec::new();
        for pull_request in &self.pull_requests {
            if matches!(self.notes.get(&pull_request.id), Some(Some(_))) {
                continue;
            }
            let mut entry = format!("- [ ] {} {}", pull_request.url, pull_request.title);
            if let Some(merger) = &pull_request.merged_by {
                entry.push_str(&format!(" (Merged by: {})", merger.display_name()));
            }
            entries.push((self.name_of(&pull_request.author.login), entry));
        }
        for commit in self
            .commits
            .iter()
            .filter(|commit| commit.associated_pull_requests.is_empty())
        {
            entries.push((
                commit.author.clone(),
                format!("- [ ] {} {}", commit.id, commit.title),
            ));
        }

        let mut by_author: BTreeMap<String, String> = BTreeMap::new();
        for (author, entry) in entries {
            let block = by_author
                .entry(author.clone())
                .or_insert_with(|| format!("## {}\n", author));
            block.push_str(&entry);
            block.push('\n');
        }

        format!(
            "# Missing Release Notes\n{}",
            by_author.into_values().collect::<Vec<_>>().join("\n")
        )
    }

    /// Every extracted note, by pull request number
    pub fn extracted_notes(&self) -> String {
        let mut document = String::from("# Extracted Release Notes\n");

        let mut pull_requests: Vec<&PullRequest> = self.pull_requests.iter().collect();
        pull_requests.sort_by_key(|pull_request| pull_request.id);
        for pull_request in pull_requests {
            let items = match self.notes_of(pull_request.id) {
                Some(items) if !items.is_empty() => items,
                _ => continue,
            };
            document.push_str(&format!(
                "- #{} (Author: {}): {}\n",
                pull_request.id,
                self.name_of(&pull_request.author.login),
                pull_request.title
            ));
            for item in items {
                document.push_str(&item.formatted("-", 2));
                document.push('\n');
            }
        }
        document
    }

    pub fn all_commits(&self) -> String {
        let lines: Vec<String> = self
            .commits
            .iter()
            .map(|commit| format!("- {} {} ({})", commit.id, commit.title, commit.author))
            .collect();
        format!("# All Commits\n{}", lines.join("\n"))
    }

    /// Body of the release-notes pull request
    pub fn summary(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.missing_notes(),
            self.extracted_notes(),
            self.all_commits()
        )
    }
}
