//! Branch/commit publishing
//!
//! Builds the review branches in the destination repository out of the staged
//! files and opens the review pull request. Each side runs the same four-step
//! sequence: create the branch ref, upload blobs and build a tree, create a
//! commit, repoint the ref. The head branch is parented on the base branch's
//! new commit, so the review PR's diff is exactly base slide → head slide.
//!
//! There are no retries and no rollback: a failure aborts the remaining steps
//! and leaves any already-created remote objects in place. Cleaning up
//! abandoned branches is the operator's responsibility.

use crate::error::{Error, Result};
use crate::host::RepoHost;
use crate::stage::StageArea;
use crate::types::{NewTreeEntry, ReviewPullRequest, Side};
use std::path::Path;

/// Fixed message for both review commits
pub const COMMIT_MESSAGE: &str = "Stage slide deck for visual diff";

/// Fixed title of the review pull request
pub const REVIEW_PR_TITLE: &str = "[deckdiff] Slide deck diff review";

/// Fixed body of the review pull request
pub const REVIEW_PR_BODY: &str =
    "Automated visual diff of the slide deck modified by the source pull request.";

/// Branch names for one review run, parameterized by source PR number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewBranches {
    /// Branch carrying the pre-change deck
    pub base: String,
    /// Branch carrying the post-change deck
    pub head: String,
}

impl ReviewBranches {
    /// Branch pair for a source PR number
    pub fn for_pr(number: u64) -> Self {
        Self {
            base: format!("deckdiff/{number}/base"),
            head: format!("deckdiff/{number}/head"),
        }
    }
}

/// Publish both staged sides and open the review pull request
///
/// The base branch starts from `origin_sha`; the head branch starts from the
/// base branch's newly created commit.
pub async fn publish_review(
    host: &dyn RepoHost,
    dest_owner: &str,
    stage: &StageArea,
    origin_sha: &str,
    pr_number: u64,
) -> Result<ReviewPullRequest> {
    let branches = ReviewBranches::for_pr(pr_number);

    let base_commit =
        publish_side(host, &stage.side_dir(Side::Base), &branches.base, origin_sha).await?;
    publish_side(host, &stage.side_dir(Side::Head), &branches.head, &base_commit).await?;

    let head = format!("{dest_owner}:{}", branches.head);
    let pr = host
        .create_pull_request(&head, &branches.base, REVIEW_PR_TITLE, REVIEW_PR_BODY)
        .await?;
    tracing::info!(number = pr.number, url = %pr.html_url, "opened review pull request");
    Ok(pr)
}

/// Publish one side: branch ref, blobs + tree, commit, ref update
///
/// Returns the SHA of the commit the branch now points at.
pub async fn publish_side(
    host: &dyn RepoHost,
    stage_dir: &Path,
    branch: &str,
    parent_sha: &str,
) -> Result<String> {
    let parent = host.create_ref(branch, parent_sha).await?;

    let entries = upload_stage_blobs(host, stage_dir).await?;
    let tree = host.create_tree(&parent, &entries).await?;

    // Resolve the parent commit object before chaining the new commit on it
    let parent_commit = host.get_commit(&parent).await?;
    let commit = host
        .create_commit(COMMIT_MESSAGE, &tree, &parent_commit)
        .await?;

    host.update_ref(branch, &commit).await?;
    tracing::debug!(branch, commit, "published side");
    Ok(commit)
}

/// Upload every regular file directly under `stage_dir` as a blob
///
/// Directories are skipped and the walk is non-recursive; entries are ordered
/// by filename so the resulting tree is deterministic.
async fn upload_stage_blobs(host: &dyn RepoHost, stage_dir: &Path) -> Result<Vec<NewTreeEntry>> {
    let mut paths: Vec<_> = std::fs::read_dir(stage_dir)
        .map_err(|e| Error::Write(format!("cannot read {}: {e}", stage_dir.display())))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read(&path)
            .map_err(|e| Error::Write(format!("cannot read {}: {e}", path.display())))?;
        let sha = host.create_blob(&content).await?;

        let rel = path
            .strip_prefix(stage_dir)
            .map_err(|e| Error::Publish(format!("path outside stage dir: {e}")))?
            .to_string_lossy()
            .into_owned();
        entries.push(NewTreeEntry::blob(rel, sha));
    }
    Ok(entries)
}
