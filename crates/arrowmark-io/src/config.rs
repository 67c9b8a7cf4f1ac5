use arrowmark_annotation::{Arrow, ArrowColor};
use arrowmark_base::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{Error, Result, io_error};

/// Application settings read from `config.json`. Every key is optional.
///
/// Arrow vectors are in volume axis order (z, y, x).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_path: PathBuf,
    pub available_colors: Vec<ArrowColor>,
    pub image_pixel_size: Vec3,
    pub default_arrow_direction: Vec3,
    pub default_arrow_length: f64,
    pub default_arrow_color: ArrowColor,
    pub default_arrow_width: f64,
    pub default_arrow_opacity: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from("."),
            available_colors: ArrowColor::PALETTE.to_vec(),
            image_pixel_size: Vec3::new(1.0, 1.0, 1.0),
            default_arrow_direction: Vec3::new(0.0, 1.0, 1.0),
            default_arrow_length: 25.0,
            default_arrow_color: ArrowColor::RED,
            default_arrow_width: 3.0,
            default_arrow_opacity: 1.0,
        }
    }
}

impl AppConfig {
    /// Arrow anchored at `end` (volume order) with the configured direction,
    /// length and style.
    pub fn default_arrow(&self, end: Vec3) -> arrowmark_annotation::Result<Arrow> {
        Arrow::with_length(
            end,
            self.default_arrow_direction,
            self.default_arrow_length,
            self.default_arrow_color.clone(),
            self.default_arrow_width,
            self.default_arrow_opacity,
        )
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.default_arrow(Vec3::ZERO)
            .map_err(|err| format!("default arrow: {err}"))?;
        let scale = self.image_pixel_size;
        if [scale.x, scale.y, scale.z]
            .iter()
            .any(|v| !(*v > 0.0) || !v.is_finite())
        {
            return Err("image_pixel_size entries must be > 0".to_string());
        }
        if self.available_colors.is_empty() {
            return Err("available_colors must not be empty".to_string());
        }
        Ok(())
    }
}

/// Reads the config at `path`, falling back to defaults when it does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "config not found; using defaults");
        return Ok(AppConfig::default());
    }

    let text = std::fs::read_to_string(path).map_err(io_error("read config", path))?;
    let config: AppConfig = serde_json::from_str(&text).map_err(|err| Error::InvalidConfig {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    config.validate().map_err(|message| Error::InvalidConfig {
        path: path.to_path_buf(),
        message,
    })?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}
