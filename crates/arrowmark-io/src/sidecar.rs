use arrowmark_annotation::ArrowStore;
use std::path::Path;
use tracing::{info, warn};

use crate::{Result, io_error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Written { count: usize },
    /// The store was empty and a sidecar already existed, so it was kept.
    SkippedEmpty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    /// No sidecar at the path; the store was not touched.
    Missing,
}

/// Writes `store` to the sidecar at `path`.
///
/// An empty store never overwrites an existing file: switching away from a
/// volume whose arrows were not loaded would otherwise wipe its sidecar.
pub fn save_sidecar(store: &ArrowStore, path: impl AsRef<Path>) -> Result<SaveOutcome> {
    let path = path.as_ref();
    if store.is_empty() && path.exists() {
        warn!(path = %path.display(), "store is empty; keeping existing sidecar");
        return Ok(SaveOutcome::SkippedEmpty);
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error("create directory", parent))?;
    }

    let bytes = store.serialize()?;
    std::fs::write(path, bytes).map_err(io_error("write sidecar", path))?;
    info!(path = %path.display(), count = store.len(), "sidecar saved");
    Ok(SaveOutcome::Written { count: store.len() })
}

/// Replaces the contents of `store` with the sidecar at `path`.
///
/// Nothing changes when the file is missing, unreadable or corrupt.
pub fn load_sidecar(store: &mut ArrowStore, path: impl AsRef<Path>) -> Result<LoadOutcome> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "sidecar does not exist");
        return Ok(LoadOutcome::Missing);
    }

    let bytes = std::fs::read(path).map_err(io_error("read sidecar", path))?;
    if let Err(err) = store.deserialize(&bytes) {
        warn!(path = %path.display(), error = %err, "sidecar load failed");
        return Err(err.into());
    }
    info!(path = %path.display(), count = store.len(), "sidecar loaded");
    Ok(LoadOutcome::Loaded { count: store.len() })
}
