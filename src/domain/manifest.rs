//! Access to the Maven project manifest (`pom.xml`).
//!
//! Only the project-level `<version>` element matters to a release. The
//! `<parent>` block carries its own version and is skipped, as are comments.

use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

pub const POM_FILE_NAME: &str = "pom.xml";

/// The manifest of the project checked out in a working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomFile {
    path: PathBuf,
}

impl PomFile {
    /// Locate `pom.xml` in `directory`, failing if it is missing or not a file
    pub fn in_directory<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let path = directory.as_ref().join(POM_FILE_NAME);
        if !path.exists() {
            return Err(ReleaseError::manifest(format!(
                "pom.xml does not exists: {}",
                path.display()
            )));
        }
        if path.is_dir() {
            return Err(ReleaseError::manifest(format!(
                "pom.xml is not a file: {}",
                path.display()
            )));
        }
        Ok(PomFile { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    pub fn write(&self, content: &str) -> Result<()> {
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Raw text of the project-level `<version>` element
    pub fn version_text(&self) -> Result<String> {
        project_version(&self.read()?).ok_or_else(|| {
            ReleaseError::manifest(format!("No version tag found in {}", self.path.display()))
        })
    }

    /// Project version; manifests always carry a snapshot version
    pub fn version(&self) -> Result<Version> {
        Version::parse_snapshot(&self.version_text()?)
    }
}

/// Extract the project-level version from pom content
pub fn project_version(content: &str) -> Option<String> {
    let comments = Regex::new(r"(?s)<!--.*?-->").ok()?;
    let parent = Regex::new(r"(?s)<parent>.*?</parent>").ok()?;
    let version = Regex::new(r"<version>\s*([^<]*?)\s*</version>").ok()?;

    let stripped = comments.replace_all(content, "");
    let stripped = parent.replace_all(&stripped, "");
    version
        .captures(&stripped)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}
