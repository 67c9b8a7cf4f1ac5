use arrowmark_annotation::{Arrow, ArrowObserver, ArrowPatch, ArrowStore};
use arrowmark_base::{Tolerance, Vec3, volume_from_world};
use arrowmark_geometry::{Matrix4, Ray, ScreenPos, closest_approach, unproject_with};
use arrowmark_io::{
    AppConfig, LoadOutcome, SaveOutcome, ViewState, load_sidecar, load_view_state, save_sidecar,
    save_view_state, snapshot_path,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::catalog::{VolumeCatalog, VolumeContext};
use crate::pick::{PickPair, PickSlot, PickState};
use crate::render::{RenderSink, primitives};
use crate::table::TableEdit;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickOutcome {
    /// Only one slot is filled so far.
    Pending,
    /// The pair triangulated and a new arrow was appended.
    Added {
        index: usize,
        /// Closest-approach midpoint, world order (x, y, z).
        midpoint: Vec3,
    },
    /// The pair was parallel and has been discarded.
    Parallel,
    /// The click could not be turned into a ray; the buffer is unchanged.
    Degenerate,
}

/// Annotation state of one viewer window: the arrows of the open volume, the
/// pending pick pair and the folder being browsed.
pub struct Session {
    config: AppConfig,
    tolerance: Tolerance,
    store: ArrowStore,
    picks: PickPair,
    catalog: VolumeCatalog,
    sidecar: Option<PathBuf>,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            tolerance: Tolerance::default(),
            store: ArrowStore::new(),
            picks: PickPair::default(),
            catalog: VolumeCatalog::default(),
            sidecar: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn arrows(&self) -> &[Arrow] {
        self.store.arrows()
    }

    pub fn store(&self) -> &ArrowStore {
        &self.store
    }

    pub fn subscribe(&mut self, observer: Box<dyn ArrowObserver>) {
        self.store.subscribe(observer);
    }

    pub fn pick_state(&self) -> PickState {
        self.picks.state()
    }

    pub fn catalog(&self) -> &VolumeCatalog {
        &self.catalog
    }

    pub fn current_sidecar(&self) -> Option<&Path> {
        self.sidecar.as_deref()
    }

    pub fn volume_context(&self) -> VolumeContext {
        VolumeContext {
            scale: self.config.image_pixel_size,
        }
    }

    pub fn on_pick_event(
        &mut self,
        slot: PickSlot,
        screen: ScreenPos,
        inverse: &Matrix4<f64>,
    ) -> Result<PickOutcome> {
        match unproject_with(screen, inverse, self.tolerance) {
            Ok(ray) => self.on_pick_ray(slot, ray),
            Err(err) => {
                warn!(?slot, x = screen.x, y = screen.y, error = %err, "pick ignored");
                Ok(PickOutcome::Degenerate)
            }
        }
    }

    pub fn on_pick_ray(&mut self, slot: PickSlot, ray: Ray) -> Result<PickOutcome> {
        let Some((first, second)) = self.picks.offer(slot, ray) else {
            debug!(?slot, "pick stored");
            return Ok(PickOutcome::Pending);
        };

        let Some(hit) = closest_approach(&first, &second, self.tolerance) else {
            warn!("picked rays are parallel; pair discarded");
            return Ok(PickOutcome::Parallel);
        };
        let midpoint = hit.midpoint();
        let index = self.add_arrow_at(midpoint)?;
        info!(index, gap = hit.gap(), midpoint = %midpoint, "arrow placed from pick pair");
        Ok(PickOutcome::Added { index, midpoint })
    }

    /// Appends a default-styled arrow whose tip is the world point `world`.
    pub fn add_arrow_at(&mut self, world: Vec3) -> Result<usize> {
        let arrow = self.config.default_arrow(volume_from_world(world))?;
        Ok(self.store.add(arrow))
    }

    pub fn add_arrow(&mut self, arrow: Arrow) -> Result<usize> {
        self.ensure_color_available(&ArrowPatch::new().color(arrow.color().clone()))?;
        Ok(self.store.add(arrow))
    }

    pub fn update_arrow(&mut self, row: usize, patch: &ArrowPatch) -> Result<()> {
        self.ensure_color_available(patch)?;
        self.store.update(row, patch)?;
        Ok(())
    }

    pub fn apply_edit(&mut self, row: usize, edit: TableEdit) -> Result<()> {
        self.update_arrow(row, &ArrowPatch::from(edit))
    }

    pub fn delete_arrow(&mut self, row: usize) -> Result<Arrow> {
        Ok(self.store.delete(row)?)
    }

    pub fn clear_arrows(&mut self) {
        self.store.clear();
    }

    pub fn render(&self, sink: &mut impl RenderSink) {
        sink.draw_arrows(&primitives(self.store.arrows()));
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<SaveOutcome> {
        Ok(save_sidecar(&self.store, path)?)
    }

    /// Writes the arrows to the open volume's sidecar, if one is open.
    pub fn save_current(&self) -> Result<Option<SaveOutcome>> {
        match &self.sidecar {
            Some(path) => self.save(path).map(Some),
            None => Ok(None),
        }
    }

    /// Loads arrows from an arbitrary sidecar without switching volumes. A
    /// missing or corrupt file keeps the current arrows.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadOutcome> {
        Ok(load_sidecar(&mut self.store, path)?)
    }

    /// Makes `path` the active sidecar, saving the previous one first.
    pub fn open_sidecar(&mut self, path: impl Into<PathBuf>) -> Result<LoadOutcome> {
        self.save_current()?;
        self.enter_sidecar(path.into())
    }

    /// Browses `folder` and opens its first volume.
    pub fn open_folder(&mut self, folder: impl AsRef<Path>) -> Result<Option<LoadOutcome>> {
        let catalog = VolumeCatalog::open(folder)?;
        self.save_current()?;
        info!(
            folder = %catalog.folder().display(),
            volumes = catalog.volumes().len(),
            "folder opened"
        );
        self.catalog = catalog;
        self.enter_current_volume()
    }

    /// Browses the folder holding `volume` and opens that volume.
    pub fn open_volume(&mut self, volume: impl AsRef<Path>) -> Result<Option<LoadOutcome>> {
        let volume = volume.as_ref();
        let folder = volume
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut catalog = VolumeCatalog::open(folder)?;
        if !catalog.select(volume) {
            return Err(Error::UnknownVolume(volume.to_path_buf()));
        }
        self.save_current()?;
        self.catalog = catalog;
        self.enter_current_volume()
    }

    pub fn next_volume(&mut self) -> Result<Option<LoadOutcome>> {
        self.step_volume(1)
    }

    pub fn prev_volume(&mut self) -> Result<Option<LoadOutcome>> {
        self.step_volume(-1)
    }

    /// Where the view-state snapshot of the open volume is kept.
    pub fn view_snapshot_path(&self) -> Option<PathBuf> {
        self.catalog
            .current()
            .map(|volume| snapshot_path(self.catalog.folder(), volume))
    }

    /// Stores `state` as the open volume's snapshot. Returns where it went, or
    /// `None` when no volume is open.
    pub fn save_view(&self, state: &ViewState) -> Result<Option<PathBuf>> {
        let Some(path) = self.view_snapshot_path() else {
            return Ok(None);
        };
        save_view_state(state, &path)?;
        Ok(Some(path))
    }

    /// The open volume's stored snapshot, if there is one.
    pub fn restore_view(&self) -> Result<Option<ViewState>> {
        match self.view_snapshot_path() {
            Some(path) => Ok(load_view_state(path)?),
            None => Ok(None),
        }
    }

    fn step_volume(&mut self, step: isize) -> Result<Option<LoadOutcome>> {
        if self.catalog.volumes().is_empty() {
            return Ok(None);
        }
        self.save_current()?;
        self.catalog.advance(step);
        self.enter_current_volume()
    }

    fn enter_current_volume(&mut self) -> Result<Option<LoadOutcome>> {
        match self.catalog.current_sidecar() {
            Some(path) => self.enter_sidecar(path).map(Some),
            None => {
                self.reset_volume_state();
                self.sidecar = None;
                Ok(None)
            }
        }
    }

    fn enter_sidecar(&mut self, path: PathBuf) -> Result<LoadOutcome> {
        self.reset_volume_state();
        info!(path = %path.display(), "switching sidecar");
        self.sidecar = Some(path.clone());
        Ok(load_sidecar(&mut self.store, &path)?)
    }

    fn reset_volume_state(&mut self) {
        self.picks.reset();
        self.store.clear();
    }

    fn ensure_color_available(&self, patch: &ArrowPatch) -> Result<()> {
        match &patch.color {
            Some(color) if !self.config.available_colors.contains(color) => {
                Err(Error::ColorUnavailable(color.clone()))
            }
            _ => Ok(()),
        }
    }
}
