//! Mock repository host for testing
//!
//! These are test utilities - not all may be used in every test file but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use deckdiff::error::{Error, Result};
use deckdiff::host::RepoHost;
use deckdiff::types::{
    BlobContent, ChangedFile, NewTreeEntry, PullRequestDetail, ReviewPullRequest, TreeObjectEntry,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_ref`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRefCall {
    pub branch: String,
    pub sha: String,
}

/// Call record for `update_ref`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRefCall {
    pub branch: String,
    pub sha: String,
}

/// Call record for `create_commit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommitCall {
    pub message: String,
    pub tree_sha: String,
    pub parent_sha: String,
}

/// Call record for `create_tree`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTreeCall {
    pub base_tree_sha: String,
    pub entries: Vec<NewTreeEntry>,
}

/// Call record for `create_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Simple mock host for testing
///
/// This manually implements `RepoHost` rather than using a mocking crate, so
/// call ordering and arguments can be asserted directly.
///
/// Features:
/// - Configurable responses (files, PR detail, tree, raw/blob content)
/// - Operation log in call order for sequencing assertions
/// - Error injection per operation name
/// - Pre-existing branches to exercise the "already exists" path
pub struct MockRepoHost {
    files: Mutex<Vec<ChangedFile>>,
    pr_detail: Mutex<Option<PullRequestDetail>>,
    tree: Mutex<Vec<TreeObjectEntry>>,
    raw_responses: Mutex<HashMap<String, Vec<u8>>>,
    blob_responses: Mutex<HashMap<String, BlobContent>>,
    existing_branches: Mutex<HashSet<String>>,
    next_object: AtomicU64,
    // Call tracking
    op_log: Mutex<Vec<String>>,
    create_ref_calls: Mutex<Vec<CreateRefCall>>,
    update_ref_calls: Mutex<Vec<UpdateRefCall>>,
    create_blob_calls: Mutex<Vec<Vec<u8>>>,
    create_tree_calls: Mutex<Vec<CreateTreeCall>>,
    create_commit_calls: Mutex<Vec<CreateCommitCall>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    // Error injection, keyed by operation name
    fail_on: Mutex<HashMap<&'static str, String>>,
}

impl Default for MockRepoHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRepoHost {
    /// Create an empty mock host
    pub fn new() -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            pr_detail: Mutex::new(None),
            tree: Mutex::new(Vec::new()),
            raw_responses: Mutex::new(HashMap::new()),
            blob_responses: Mutex::new(HashMap::new()),
            existing_branches: Mutex::new(HashSet::new()),
            next_object: AtomicU64::new(1),
            op_log: Mutex::new(Vec::new()),
            create_ref_calls: Mutex::new(Vec::new()),
            update_ref_calls: Mutex::new(Vec::new()),
            create_blob_calls: Mutex::new(Vec::new()),
            create_tree_calls: Mutex::new(Vec::new()),
            create_commit_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            fail_on: Mutex::new(HashMap::new()),
        }
    }

    // === Response configuration ===

    /// Set the PR changed-files listing
    pub fn set_files(&self, files: Vec<ChangedFile>) {
        *self.files.lock().unwrap() = files;
    }

    /// Set the PR detail (base SHA)
    pub fn set_pr_detail(&self, base_sha: &str) {
        *self.pr_detail.lock().unwrap() = Some(PullRequestDetail {
            base_sha: base_sha.to_string(),
        });
    }

    /// Set the recursive tree listing
    pub fn set_tree(&self, tree: Vec<TreeObjectEntry>) {
        *self.tree.lock().unwrap() = tree;
    }

    /// Set the bytes served for a raw content URL
    pub fn set_raw_response(&self, url: &str, bytes: &[u8]) {
        self.raw_responses
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes.to_vec());
    }

    /// Set the blob object served for a blob URL
    pub fn set_blob_response(&self, url: &str, content: &str, encoding: &str) {
        self.blob_responses.lock().unwrap().insert(
            url.to_string(),
            BlobContent {
                content: content.to_string(),
                encoding: encoding.to_string(),
            },
        );
    }

    /// Mark a branch as already existing (create_ref takes the 422 path)
    pub fn add_existing_branch(&self, branch: &str) {
        self.existing_branches
            .lock()
            .unwrap()
            .insert(branch.to_string());
    }

    /// Make the named operation return an error
    pub fn fail_on(&self, op: &'static str, msg: &str) {
        self.fail_on.lock().unwrap().insert(op, msg.to_string());
    }

    // === Call verification ===

    /// Operation names in call order
    pub fn op_log(&self) -> Vec<String> {
        self.op_log.lock().unwrap().clone()
    }

    /// All `create_ref` calls
    pub fn create_ref_calls(&self) -> Vec<CreateRefCall> {
        self.create_ref_calls.lock().unwrap().clone()
    }

    /// All `update_ref` calls
    pub fn update_ref_calls(&self) -> Vec<UpdateRefCall> {
        self.update_ref_calls.lock().unwrap().clone()
    }

    /// All `create_blob` payloads
    pub fn create_blob_calls(&self) -> Vec<Vec<u8>> {
        self.create_blob_calls.lock().unwrap().clone()
    }

    /// All `create_tree` calls
    pub fn create_tree_calls(&self) -> Vec<CreateTreeCall> {
        self.create_tree_calls.lock().unwrap().clone()
    }

    /// All `create_commit` calls
    pub fn create_commit_calls(&self) -> Vec<CreateCommitCall> {
        self.create_commit_calls.lock().unwrap().clone()
    }

    /// All `create_pull_request` calls
    pub fn create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Assert that an operation was never invoked
    pub fn assert_never_called(&self, op: &str) {
        let log = self.op_log();
        assert!(
            !log.iter().any(|o| o == op),
            "Expected {op} to never be called but got: {log:?}"
        );
    }

    fn record(&self, op: &'static str) -> Result<()> {
        self.op_log.lock().unwrap().push(op.to_string());
        if let Some(msg) = self.fail_on.lock().unwrap().get(op) {
            let msg = msg.clone();
            return Err(match op {
                "create_blob" | "create_tree" | "get_commit" | "create_commit" | "create_ref"
                | "update_ref" | "create_pull_request" => Error::Publish(msg),
                _ => Error::Fetch(msg),
            });
        }
        Ok(())
    }

    fn next_sha(&self, kind: &str) -> String {
        let n = self.next_object.fetch_add(1, Ordering::SeqCst);
        format!("{kind}-sha-{n}")
    }
}

#[async_trait]
impl RepoHost for MockRepoHost {
    async fn list_pull_request_files(&self, _number: u64) -> Result<Vec<ChangedFile>> {
        self.record("list_pull_request_files")?;
        Ok(self.files.lock().unwrap().clone())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetail> {
        self.record("get_pull_request")?;
        self.pr_detail
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Fetch(format!("no PR detail configured for #{number}")))
    }

    async fn get_tree(&self, _sha: &str) -> Result<Vec<TreeObjectEntry>> {
        self.record("get_tree")?;
        Ok(self.tree.lock().unwrap().clone())
    }

    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>> {
        self.record("fetch_raw")?;
        self.raw_responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("no raw response configured for {url}")))
    }

    async fn fetch_blob(&self, url: &str) -> Result<BlobContent> {
        self.record("fetch_blob")?;
        self.blob_responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("no blob response configured for {url}")))
    }

    async fn create_blob(&self, content: &[u8]) -> Result<String> {
        self.record("create_blob")?;
        self.create_blob_calls.lock().unwrap().push(content.to_vec());
        Ok(self.next_sha("blob"))
    }

    async fn create_tree(&self, base_tree_sha: &str, entries: &[NewTreeEntry]) -> Result<String> {
        self.record("create_tree")?;
        self.create_tree_calls.lock().unwrap().push(CreateTreeCall {
            base_tree_sha: base_tree_sha.to_string(),
            entries: entries.to_vec(),
        });
        Ok(self.next_sha("tree"))
    }

    async fn get_commit(&self, sha: &str) -> Result<String> {
        self.record("get_commit")?;
        Ok(sha.to_string())
    }

    async fn create_commit(
        &self,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
    ) -> Result<String> {
        self.record("create_commit")?;
        self.create_commit_calls
            .lock()
            .unwrap()
            .push(CreateCommitCall {
                message: message.to_string(),
                tree_sha: tree_sha.to_string(),
                parent_sha: parent_sha.to_string(),
            });
        Ok(self.next_sha("commit"))
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<String> {
        self.record("create_ref")?;
        self.create_ref_calls.lock().unwrap().push(CreateRefCall {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });
        // Existing branches take the already-exists path: success, target
        // assumed to be the requested parent
        self.existing_branches
            .lock()
            .unwrap()
            .insert(branch.to_string());
        Ok(sha.to_string())
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()> {
        self.record("update_ref")?;
        self.update_ref_calls.lock().unwrap().push(UpdateRefCall {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });
        Ok(())
    }

    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<ReviewPullRequest> {
        self.record("create_pull_request")?;
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        let number = self.next_object.fetch_add(1, Ordering::SeqCst);
        Ok(ReviewPullRequest {
            number,
            html_url: format!("https://github.com/test/review/pull/{number}"),
            head_ref: head.to_string(),
            base_ref: base.to_string(),
            title: title.to_string(),
        })
    }
}
