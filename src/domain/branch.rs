use crate::domain::Version;

const RELEASE_BRANCH_PREFIX: &str = "release-";
const RELEASE_NOTES_BRANCH_PREFIX: &str = "release-notes-";

/// The branch that carries a major version from cut to finalize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBranch {
    pub name: String,
    pub version: Version,
}

impl ReleaseBranch {
    /// Release branch of the major version `version` belongs to
    pub fn for_version(version: &Version) -> Self {
        let major = version.major_version();
        ReleaseBranch {
            name: format!("{}{}", RELEASE_BRANCH_PREFIX, major),
            version: major,
        }
    }

    /// Remote-tracking ref of this branch on `remote`
    pub fn remote_ref(&self, remote: &str) -> String {
        format!("{}/{}", remote, self.name)
    }
}

/// Branch holding the generated release notes for `version`
pub fn release_notes_branch(version: &Version) -> String {
    format!("{}{}", RELEASE_NOTES_BRANCH_PREFIX, version)
}
