//! Hosting-service access
//!
//! Provides the capability interface the pipeline uses to talk to the remote
//! hosting API, plus the GitHub implementation.

mod github;

pub use github::GitHubHost;

use crate::error::Result;
use crate::types::{
    BlobContent, ChangedFile, NewTreeEntry, PullRequestDetail, ReviewPullRequest, TreeObjectEntry,
};
use async_trait::async_trait;

/// Capability interface for one repository on the hosting service
///
/// Each handle is bound to exactly one repository and never retargeted; the
/// pipeline holds two distinct handles, one for the source repository it reads
/// from and one for the destination repository it publishes to.
///
/// Success checks are exact status comparisons made by the implementation;
/// every method surfaces an unexpected status or transport failure as an
/// error with no retry.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// List the files changed by a pull request, in API order
    async fn list_pull_request_files(&self, number: u64) -> Result<Vec<ChangedFile>>;

    /// Fetch PR detail (base commit SHA)
    async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetail>;

    /// Fetch the full recursive file tree at a commit SHA
    async fn get_tree(&self, sha: &str) -> Result<Vec<TreeObjectEntry>>;

    /// Download raw bytes from a content URL (a changed file's `raw_url`)
    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>>;

    /// Fetch a git blob object by its API URL
    async fn fetch_blob(&self, url: &str) -> Result<BlobContent>;

    /// Upload file bytes as a blob, returning its SHA
    async fn create_blob(&self, content: &[u8]) -> Result<String>;

    /// Create a tree from entries, rooted at `base_tree_sha`, returning its SHA
    async fn create_tree(&self, base_tree_sha: &str, entries: &[NewTreeEntry]) -> Result<String>;

    /// Resolve a commit SHA to the commit object's SHA (existence check for
    /// the parent of a new commit)
    async fn get_commit(&self, sha: &str) -> Result<String>;

    /// Create a commit with one parent, returning its SHA
    async fn create_commit(&self, message: &str, tree_sha: &str, parent_sha: &str)
    -> Result<String>;

    /// Create a branch pointing at `sha`
    ///
    /// "Already exists" counts as success; the returned SHA is the branch's
    /// target (the parent for the commit built on this branch).
    async fn create_ref(&self, branch: &str, sha: &str) -> Result<String>;

    /// Repoint a branch at a commit (non-force)
    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()>;

    /// Open a pull request from `head` into `base`
    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<ReviewPullRequest>;
}
