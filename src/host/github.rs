//! GitHub host implementation
//!
//! Raw REST client over reqwest. The publisher needs the low-level git data
//! endpoints (blobs, trees, commits, refs) and the extractor needs the
//! recursive-tree walk, so every call is made directly with exact status
//! checks rather than through a higher-level API wrapper.

use crate::error::{Error, Result};
use crate::host::RepoHost;
use crate::types::{
    BlobContent, ChangedFile, NewTreeEntry, PullRequestDetail, RepoId, ReviewPullRequest,
    TreeObjectEntry,
};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Default GitHub API base URL
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests
const USER_AGENT: &str = "deckdiff";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitHub host bound to one repository
///
/// Owner and repo are fixed at construction; the pipeline builds one handle
/// per repository it touches instead of retargeting a shared one.
pub struct GitHubHost {
    client: Client,
    token: String,
    repo_id: RepoId,
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubHost")
            .field("owner", &self.repo_id.owner)
            .field("repo", &self.repo_id.repo)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct PrDetailWire {
    base: PrBaseWire,
}

#[derive(Deserialize)]
struct PrBaseWire {
    sha: String,
}

#[derive(Deserialize)]
struct TreeWire {
    tree: Vec<TreeEntryWire>,
}

#[derive(Deserialize)]
struct TreeEntryWire {
    path: String,
    // Absent for submodule entries
    url: Option<String>,
}

#[derive(Serialize)]
struct CreateBlobPayload {
    content: String,
    encoding: &'static str,
}

#[derive(Serialize)]
struct CreateTreePayload<'a> {
    base_tree: &'a str,
    tree: &'a [NewTreeEntry],
}

#[derive(Serialize)]
struct CreateCommitPayload<'a> {
    message: &'a str,
    tree: &'a str,
    parents: Vec<&'a str>,
}

#[derive(Serialize)]
struct CreateRefPayload {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: String,
}

#[derive(Serialize)]
struct UpdateRefPayload<'a> {
    sha: &'a str,
    force: bool,
}

#[derive(Serialize)]
struct CreatePrPayload<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct ShaWire {
    sha: String,
}

#[derive(Deserialize)]
struct RefWire {
    object: ShaWire,
}

#[derive(Deserialize)]
struct PullRequestWire {
    number: u64,
    html_url: String,
    head: RefNameWire,
    base: RefNameWire,
    title: String,
}

#[derive(Deserialize)]
struct RefNameWire {
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(Deserialize)]
struct ErrorWire {
    message: String,
}

impl GitHubHost {
    /// Create a host handle for one repository
    pub fn new(token: impl Into<String>, repo_id: RepoId) -> Self {
        Self::with_api_base(token, repo_id, DEFAULT_API_BASE)
    }

    /// Create a host handle with a custom API base URL
    ///
    /// Used by tests pointing at a local mock server, and usable for GitHub
    /// Enterprise installations.
    pub fn with_api_base(
        token: impl Into<String>,
        repo_id: RepoId,
        api_base: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token: token.into(),
            repo_id,
            api_base: api_base.into(),
        }
    }

    /// Repository this handle is bound to
    pub const fn repo_id(&self) -> &RepoId {
        &self.repo_id
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.repo_id.owner, self.repo_id.repo, path
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Read the error message from a failed response body, best-effort
    async fn error_message(response: Response) -> String {
        match response.json::<ErrorWire>().await {
            Ok(err) => err.message,
            Err(_) => "unknown error".to_string(),
        }
    }

    /// Send a read request and require an exact 200, mapping to `Error::Fetch`
    async fn get_expecting_ok(&self, what: &str, url: &str) -> Result<Response> {
        let response = self
            .request(self.client.get(url))
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("{what}: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = Self::error_message(response).await;
            return Err(Error::fetch_status(what, status.as_u16(), &message));
        }
        Ok(response)
    }

    /// Send a write request and require an exact 201, mapping to `Error::Publish`
    async fn post_expecting_created<B: Serialize>(
        &self,
        what: &str,
        url: &str,
        payload: &B,
    ) -> Result<Response> {
        let response = self
            .request(self.client.post(url))
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Publish(format!("{what}: {e}")))?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let message = Self::error_message(response).await;
            return Err(Error::publish_status(what, status.as_u16(), &message));
        }
        Ok(response)
    }

    async fn parse_json<T: for<'de> Deserialize<'de>>(
        what: &str,
        response: Response,
        wrap: fn(String) -> Error,
    ) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| wrap(format!("{what}: malformed response: {e}")))
    }

    /// Current target commit of an existing branch
    async fn get_ref_target(&self, branch: &str) -> Result<String> {
        let url = self.repo_url(&format!("git/ref/heads/{branch}"));
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Publish(format!("get ref: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = Self::error_message(response).await;
            return Err(Error::publish_status("get ref", status.as_u16(), &message));
        }
        let existing: RefWire = Self::parse_json("get ref", response, Error::Publish).await?;
        Ok(existing.object.sha)
    }
}

#[async_trait]
impl RepoHost for GitHubHost {
    async fn list_pull_request_files(&self, number: u64) -> Result<Vec<ChangedFile>> {
        let url = self.repo_url(&format!("pulls/{number}/files"));
        let response = self.get_expecting_ok("list PR files", &url).await?;
        Self::parse_json("list PR files", response, Error::Fetch).await
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetail> {
        let url = self.repo_url(&format!("pulls/{number}"));
        let response = self.get_expecting_ok("get PR", &url).await?;
        let detail: PrDetailWire = Self::parse_json("get PR", response, Error::Fetch).await?;
        Ok(PullRequestDetail {
            base_sha: detail.base.sha,
        })
    }

    async fn get_tree(&self, sha: &str) -> Result<Vec<TreeObjectEntry>> {
        let url = self.repo_url(&format!("git/trees/{sha}?recursive=1"));
        let response = self.get_expecting_ok("get tree", &url).await?;
        let tree: TreeWire = Self::parse_json("get tree", response, Error::Fetch).await?;
        Ok(tree
            .tree
            .into_iter()
            .filter_map(|e| {
                e.url.map(|url| TreeObjectEntry { path: e.path, url })
            })
            .collect())
    }

    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get_expecting_ok("fetch raw content", url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(format!("fetch raw content: {e}")))?;
        Ok(bytes.to_vec())
    }

    async fn fetch_blob(&self, url: &str) -> Result<BlobContent> {
        let response = self.get_expecting_ok("fetch blob", url).await?;
        Self::parse_json("fetch blob", response, Error::Fetch).await
    }

    async fn create_blob(&self, content: &[u8]) -> Result<String> {
        let url = self.repo_url("git/blobs");
        let payload = CreateBlobPayload {
            content: BASE64.encode(content),
            encoding: "base64",
        };
        let response = self
            .post_expecting_created("create blob", &url, &payload)
            .await?;
        let blob: ShaWire = Self::parse_json("create blob", response, Error::Publish).await?;
        Ok(blob.sha)
    }

    async fn create_tree(&self, base_tree_sha: &str, entries: &[NewTreeEntry]) -> Result<String> {
        let url = self.repo_url("git/trees");
        let payload = CreateTreePayload {
            base_tree: base_tree_sha,
            tree: entries,
        };
        let response = self
            .post_expecting_created("create tree", &url, &payload)
            .await?;
        let tree: ShaWire = Self::parse_json("create tree", response, Error::Publish).await?;
        Ok(tree.sha)
    }

    async fn get_commit(&self, sha: &str) -> Result<String> {
        let url = self.repo_url(&format!("git/commits/{sha}"));
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Publish(format!("get commit: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = Self::error_message(response).await;
            return Err(Error::publish_status("get commit", status.as_u16(), &message));
        }
        let commit: ShaWire = Self::parse_json("get commit", response, Error::Publish).await?;
        Ok(commit.sha)
    }

    async fn create_commit(
        &self,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
    ) -> Result<String> {
        let url = self.repo_url("git/commits");
        let payload = CreateCommitPayload {
            message,
            tree: tree_sha,
            parents: vec![parent_sha],
        };
        let response = self
            .post_expecting_created("create commit", &url, &payload)
            .await?;
        let commit: ShaWire = Self::parse_json("create commit", response, Error::Publish).await?;
        Ok(commit.sha)
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<String> {
        let url = self.repo_url("git/refs");
        let payload = CreateRefPayload {
            ref_name: format!("refs/heads/{branch}"),
            sha: sha.to_string(),
        };
        let response = self
            .request(self.client.post(&url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Publish(format!("create ref: {e}")))?;

        match response.status() {
            StatusCode::CREATED => {
                let created: RefWire =
                    Self::parse_json("create ref", response, Error::Publish).await?;
                Ok(created.object.sha)
            }
            // Already exists: treated as success. Look up the branch's
            // actual target so a diverged branch chains the commit on the
            // right parent.
            StatusCode::UNPROCESSABLE_ENTITY => {
                tracing::debug!(branch, "branch already exists, reusing");
                self.get_ref_target(branch).await
            }
            status => {
                let message = Self::error_message(response).await;
                Err(Error::publish_status("create ref", status.as_u16(), &message))
            }
        }
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()> {
        let url = self.repo_url(&format!("git/refs/heads/{branch}"));
        let payload = UpdateRefPayload { sha, force: false };
        let response = self
            .request(self.client.patch(&url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Publish(format!("update ref: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = Self::error_message(response).await;
            return Err(Error::publish_status("update ref", status.as_u16(), &message));
        }
        Ok(())
    }

    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<ReviewPullRequest> {
        let url = self.repo_url("pulls");
        let payload = CreatePrPayload {
            title,
            head,
            base,
            body,
        };
        let response = self
            .post_expecting_created("create pull request", &url, &payload)
            .await?;
        let pr: PullRequestWire =
            Self::parse_json("create pull request", response, Error::Publish).await?;
        Ok(ReviewPullRequest {
            number: pr.number,
            html_url: pr.html_url,
            head_ref: pr.head.ref_name,
            base_ref: pr.base.ref_name,
            title: pr.title,
        })
    }
}
