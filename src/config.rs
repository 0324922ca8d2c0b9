//! Run configuration
//!
//! A deckdiff run is described by a single JSON document naming the source
//! pull request, the destination repository, and an access token. The file is
//! read once at startup; any problem is fatal before the first remote call.

use crate::error::{Error, Result};
use crate::types::RepoId;
use serde::Deserialize;
use std::path::Path;

/// The source pull request to diff
#[derive(Debug, Clone, Deserialize)]
pub struct SourcePullRequest {
    /// Repository the PR lives in
    pub repository: RepoId,
    /// PR number
    pub number: u64,
}

/// The destination repository for the review branches and PR
#[derive(Debug, Clone, Deserialize)]
pub struct Destination {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Commit the review base branch starts from
    pub origin_sha: String,
}

/// Complete run configuration, immutable once loaded
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Source pull request
    pub pull_request: SourcePullRequest,
    /// Destination repository
    pub dest: Destination,
    /// Bearer token for the hosting API
    pub access_token: String,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| Error::Config(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Destination repository id
    pub fn dest_repo(&self) -> RepoId {
        RepoId {
            owner: self.dest.owner.clone(),
            repo: self.dest.repo.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            return Err(Error::Config("access_token is empty".to_string()));
        }
        for (field, value) in [
            ("pull_request.repository.owner", &self.pull_request.repository.owner),
            ("pull_request.repository.repo", &self.pull_request.repository.repo),
            ("dest.owner", &self.dest.owner),
            ("dest.repo", &self.dest.repo),
            ("dest.origin_sha", &self.dest.origin_sha),
        ] {
            if value.is_empty() {
                return Err(Error::Config(format!("{field} is empty")));
            }
        }
        Ok(())
    }
}
