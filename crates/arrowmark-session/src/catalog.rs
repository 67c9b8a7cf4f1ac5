use arrowmark_base::Vec3;
use arrowmark_io::{list_volumes, sidecar_path};
use std::path::{Path, PathBuf};

/// The TIFF stacks of one folder and which of them is open.
#[derive(Clone, Debug, Default)]
pub struct VolumeCatalog {
    folder: PathBuf,
    volumes: Vec<PathBuf>,
    index: usize,
}

impl VolumeCatalog {
    pub fn open(folder: impl AsRef<Path>) -> arrowmark_io::Result<Self> {
        let folder = folder.as_ref().to_path_buf();
        let volumes = list_volumes(&folder)?;
        Ok(Self {
            folder,
            volumes,
            index: 0,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn volumes(&self) -> &[PathBuf] {
        &self.volumes
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Path> {
        self.volumes.get(self.index).map(PathBuf::as_path)
    }

    pub fn current_sidecar(&self) -> Option<PathBuf> {
        self.current().map(sidecar_path)
    }

    /// Makes the volume with the same file name as `volume` current.
    pub fn select(&mut self, volume: &Path) -> bool {
        match self
            .volumes
            .iter()
            .position(|candidate| candidate.file_name() == volume.file_name())
        {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    /// Moves `step` volumes forward (negative steps go back), wrapping around.
    /// Returns `false` when the catalog is empty.
    pub fn advance(&mut self, step: isize) -> bool {
        let count = self.volumes.len();
        if count == 0 {
            return false;
        }
        let offset = step.rem_euclid(count as isize) as usize;
        self.index = (self.index + offset) % count;
        true
    }
}

/// Voxel spacing of the open volume, in volume axis order (z, y, x).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeContext {
    pub scale: Vec3,
}

impl VolumeContext {
    /// World point (volume order) to fractional voxel indices.
    pub fn to_voxel(&self, point: Vec3) -> Vec3 {
        point.component_div(self.scale)
    }
}
