//! Change extraction
//!
//! Pulls the two sides of the deck diff out of the source pull request: the
//! head version from the PR's changed-file listing and the base version from
//! the git tree at the PR's base commit.
//!
//! The base side deliberately walks tree → blob instead of the contents
//! endpoint: the contents endpoint rejects files above 1 MB and deck files
//! routinely exceed that, while blob objects can be fetched up to 100 MB.

use crate::error::{Error, Result};
use crate::host::RepoHost;
use crate::types::{DECK_EXTENSION, ChangedFile, DeckFile};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

/// Fetch the head-of-branch version of the deck file changed by the PR
///
/// Scans the changed-file listing in API order and takes the first entry
/// whose name ends in the deck extension; earlier entries win by definition.
pub async fn fetch_head_file(host: &dyn RepoHost, number: u64) -> Result<DeckFile> {
    let files = host.list_pull_request_files(number).await?;
    let file = select_deck_file(&files).ok_or_else(|| {
        Error::NotFound(format!("no {DECK_EXTENSION} file among PR #{number} changes"))
    })?;

    if file.status != "modified" {
        tracing::warn!(filename = %file.filename, status = %file.status, "deck file is not a modification");
    }

    let content = host.fetch_raw(&file.raw_url).await?;
    Ok(DeckFile {
        filename: file.filename.clone(),
        content,
        status: Some(file.status.clone()),
    })
}

/// Fetch the pre-change version of `filename` from the PR's base commit
pub async fn fetch_base_file(
    host: &dyn RepoHost,
    number: u64,
    filename: &str,
) -> Result<DeckFile> {
    let detail = host.get_pull_request(number).await?;
    let tree = host.get_tree(&detail.base_sha).await?;

    let entry = tree.iter().find(|e| e.path == filename).ok_or_else(|| {
        Error::NotFound(format!(
            "{filename} not present in tree at base commit {}",
            detail.base_sha
        ))
    })?;

    let blob = host.fetch_blob(&entry.url).await?;
    let content = decode_blob_content(&blob.content)?;
    Ok(DeckFile {
        filename: filename.to_string(),
        content,
        status: None,
    })
}

/// First deck-format entry in listing order, if any
fn select_deck_file(files: &[ChangedFile]) -> Option<&ChangedFile> {
    files.iter().find(|f| f.filename.ends_with(DECK_EXTENSION))
}

/// Decode a git blob's base64 payload
///
/// The API wraps blob content with newlines, which the strict base64 decoder
/// rejects, so they are stripped first.
fn decode_blob_content(content: &str) -> Result<Vec<u8>> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64
        .decode(compact)
        .map_err(|e| Error::Decode(format!("blob content is not valid base64: {e}")))
}
