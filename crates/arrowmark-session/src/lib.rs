use thiserror::Error;

mod catalog;
mod pick;
mod render;
mod session;
mod table;

pub use catalog::{VolumeCatalog, VolumeContext};
pub use pick::{PickPair, PickSlot, PickState};
pub use render::{ArrowPrimitive, PrimitiveCollector, RenderSink, primitives};
pub use session::{PickOutcome, Session};
pub use table::{ArrowRow, ArrowTable, TableEdit};

#[derive(Error, Debug)]
pub enum Error {
    #[error("color {0} is not offered by the palette")]
    ColorUnavailable(arrowmark_annotation::ArrowColor),
    #[error("{} is not a TIFF stack in its folder", .0.display())]
    UnknownVolume(std::path::PathBuf),
    #[error(transparent)]
    Annotation(#[from] arrowmark_annotation::Error),
    #[error(transparent)]
    Io(#[from] arrowmark_io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
