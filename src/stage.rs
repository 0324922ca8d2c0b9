//! Local staging
//!
//! Materializes the two retrieved payloads into a per-run temporary directory
//! with one subdirectory per side. Both sides land under a fixed name
//! (`slide.pptx`); the original filename is not preserved. The whole
//! directory is removed when the stage area is dropped, success or failure.

use crate::error::{Error, Result};
use crate::types::{DeckFile, Side};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fixed on-disk name for a staged slide, either side
pub const STAGED_FILE_NAME: &str = "slide.pptx";

/// Per-run staging directory with `base/` and `head/` subdirectories
#[derive(Debug)]
pub struct StageArea {
    root: TempDir,
}

impl StageArea {
    /// Create a fresh staging directory with both side subdirectories
    pub fn new() -> Result<Self> {
        let root = TempDir::with_prefix("deckdiff-")
            .map_err(|e| Error::Write(format!("cannot create staging directory: {e}")))?;
        for side in [Side::Base, Side::Head] {
            std::fs::create_dir(root.path().join(side.dir_name())).map_err(|e| {
                Error::Write(format!("cannot create {} directory: {e}", side.dir_name()))
            })?;
        }
        Ok(Self { root })
    }

    /// Write a payload to its side's fixed filename
    pub fn stage(&self, payload: &DeckFile, side: Side) -> Result<PathBuf> {
        let path = self.side_dir(side).join(STAGED_FILE_NAME);
        std::fs::write(&path, &payload.content)
            .map_err(|e| Error::Write(format!("cannot write {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), bytes = payload.content.len(), "staged payload");
        Ok(path)
    }

    /// Directory holding one side's staged file
    pub fn side_dir(&self, side: Side) -> PathBuf {
        self.root.path().join(side.dir_name())
    }

    /// Root of the staging directory
    pub fn path(&self) -> &Path {
        self.root.path()
    }
}
