//! Core types for deckdiff

use serde::{Deserialize, Serialize};

/// Recognized deck-file extension
///
/// The first changed file in the pull request whose name ends with this
/// extension is the one staged for review; all other files are ignored.
pub const DECK_EXTENSION: &str = ".pptx";

/// A repository identified by owner and name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

/// Which side of the diff a payload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Pre-change version, taken from the PR's base commit
    Base,
    /// Post-change version, taken from the PR's head branch tip
    Head,
}

impl Side {
    /// Staging subdirectory name for this side
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Head => "head",
        }
    }
}

/// A retrieved deck file payload
///
/// Created by the extractor, consumed exactly once by the stager, never
/// mutated. Base and head payloads for one run always share the same
/// `filename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckFile {
    /// Path of the file inside the source repository
    pub filename: String,
    /// Raw file bytes
    pub content: Vec<u8>,
    /// Change status reported by the PR file listing (e.g. "modified");
    /// absent for base-side payloads
    pub status: Option<String>,
}

/// A file entry from the PR changed-files listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path of the file inside the repository
    pub filename: String,
    /// Change status ("added", "modified", "removed", ...)
    pub status: String,
    /// URL serving the file's raw head-of-branch content
    pub raw_url: String,
}

/// The subset of PR detail this tool needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDetail {
    /// SHA of the PR's base commit
    pub base_sha: String,
}

/// An entry from a recursive git tree listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeObjectEntry {
    /// Path relative to the repository root
    pub path: String,
    /// API URL of the underlying git object (blob URL for files)
    pub url: String,
}

/// A git blob object as served by the hosting API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobContent {
    /// Transport-encoded file content (base64, possibly newline-wrapped)
    pub content: String,
    /// Transport encoding name (expected "base64")
    pub encoding: String,
}

/// An entry for a tree object under construction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTreeEntry {
    /// Path relative to the tree root
    pub path: String,
    /// Git file mode (always "100644" for staged slides)
    pub mode: String,
    /// Git object type (always "blob")
    #[serde(rename = "type")]
    pub entry_type: String,
    /// SHA of the uploaded blob
    pub sha: String,
}

impl NewTreeEntry {
    /// A regular-file blob entry at `path`
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: "100644".to_string(),
            entry_type: "blob".to_string(),
            sha: sha.into(),
        }
    }
}

/// The review pull request created by the publisher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPullRequest {
    /// PR number in the destination repository
    pub number: u64,
    /// Web URL of the PR
    pub html_url: String,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// PR title
    pub title: String,
}
