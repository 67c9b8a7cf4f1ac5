use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Result, io_error};

const VOLUME_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// TIFF stacks directly inside `folder`, sorted by path.
pub fn list_volumes(folder: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    let entries = std::fs::read_dir(folder).map_err(io_error("list folder", folder))?;

    let mut volumes = Vec::new();
    for entry in entries {
        let path = entry.map_err(io_error("list folder", folder))?.path();
        if path.is_file() && is_volume(&path) {
            volumes.push(path);
        }
    }
    volumes.sort();
    debug!(folder = %folder.display(), count = volumes.len(), "volumes listed");
    Ok(volumes)
}

/// The sidecar of a volume is the same path with a `.json` extension.
pub fn sidecar_path(volume: impl AsRef<Path>) -> PathBuf {
    volume.as_ref().with_extension("json")
}

fn is_volume(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VOLUME_EXTENSIONS.contains(&ext))
}
