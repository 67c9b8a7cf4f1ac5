use arrowmark_base::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Result, io_error};

/// Camera and slider state, stored so a view can be restored later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub dims_point: Vec<f64>,
    pub camera_center: Vec3,
    /// Euler angles in degrees, as the host camera reports them.
    pub camera_angles: Vec3,
    pub camera_zoom: f64,
}

/// `<folder>/snapshots/<volume stem>_view.json`
pub fn snapshot_path(folder: impl AsRef<Path>, volume: impl AsRef<Path>) -> PathBuf {
    let stem = volume
        .as_ref()
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("volume");
    folder
        .as_ref()
        .join("snapshots")
        .join(format!("{stem}_view.json"))
}

pub fn save_view_state(state: &ViewState, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error("create directory", parent))?;
    }
    let bytes = serde_json::to_vec_pretty(state)?;
    std::fs::write(path, bytes).map_err(io_error("write view state", path))?;
    info!(path = %path.display(), "view state saved");
    Ok(())
}

/// Returns `None` when no snapshot exists at `path`.
pub fn load_view_state(path: impl AsRef<Path>) -> Result<Option<ViewState>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "view state does not exist");
        return Ok(None);
    }
    let bytes = std::fs::read(path).map_err(io_error("read view state", path))?;
    let state = serde_json::from_slice(&bytes)?;
    info!(path = %path.display(), "view state restored");
    Ok(Some(state))
}
