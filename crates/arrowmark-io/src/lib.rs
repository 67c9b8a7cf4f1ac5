use std::path::PathBuf;
use thiserror::Error;

pub mod config;
pub mod sidecar;
pub mod view_state;
pub mod volumes;

pub use config::{AppConfig, load_config};
pub use sidecar::{LoadOutcome, SaveOutcome, load_sidecar, save_sidecar};
pub use view_state::{ViewState, load_view_state, save_view_state, snapshot_path};
pub use volumes::{list_volumes, sidecar_path};

#[derive(Error, Debug)]
pub enum Error {
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },
    #[error(transparent)]
    Annotation(#[from] arrowmark_annotation::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn io_error(
    action: &'static str,
    path: impl Into<PathBuf>,
) -> impl FnOnce(std::io::Error) -> Error {
    let path = path.into();
    move |source| Error::Io {
        action,
        path,
        source,
    }
}
