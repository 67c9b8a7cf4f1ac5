use thiserror::Error;

mod arrow;
mod sidecar;
mod store;

pub use arrow::{Arrow, ArrowColor, ArrowPatch};
pub use sidecar::{SidecarRecord, decode_sidecar, encode_sidecar};
pub use store::{ArrowObserver, ArrowStore};

pub use arrowmark_base::Vec3;

#[derive(Error, Debug)]
pub enum Error {
    #[error("arrow index {index} out of range (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("corrupt sidecar file: {0}")]
    CorruptFile(String),
    #[error("invalid arrow color: {0:?}")]
    InvalidColor(String),
    #[error(transparent)]
    Base(#[from] arrowmark_base::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
