use thiserror::Error;

mod math;

pub use math::Vec3;

#[derive(Clone, Copy, Debug)]
pub struct Tolerance {
    /// Smallest ray direction length accepted after unprojection.
    pub direction: f64,
    /// Relative threshold on the triangulation determinant.
    pub parallel: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            direction: 1.0e-9,
            parallel: 1.0e-8,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Converts a point picked in world axis order (x, y, z) into the volume axis
/// order (z, y, x) used by arrows and sidecar files.
///
/// This is the only place the permutation happens. The mapping is its own
/// inverse, so [`world_from_volume`] is the same reversal.
pub fn volume_from_world(world: Vec3) -> Vec3 {
    world.reversed()
}

pub fn world_from_volume(volume: Vec3) -> Vec3 {
    volume.reversed()
}

pub fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(Error::InvalidParameter(format!("{name} must be > 0")));
    }
    Ok(())
}

pub fn ensure_unit_interval(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidParameter(format!(
            "{name} must be within [0, 1]"
        )));
    }
    Ok(())
}
