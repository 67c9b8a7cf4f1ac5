use arrowmark_base::{Tolerance, Vec3};
use cgmath::{Matrix, Matrix4, Vector4};

use crate::{Error, Result};

/// Canvas position of a click, in the host's screen units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Half-line `origin + t * direction` with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self> {
        Self::with_tolerance(origin, direction, Tolerance::default().direction)
    }

    fn with_tolerance(origin: Vec3, direction: Vec3, eps: f64) -> Result<Self> {
        let direction = direction
            .try_normalized(eps)
            .ok_or(Error::DegenerateTransform)?;
        Ok(Self { origin, direction })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Builds a transform from row-major entries, the order matrices are usually
/// written down in. cgmath stores columns.
pub fn matrix_from_rows(rows: [[f64; 4]; 4]) -> Matrix4<f64> {
    Matrix4::from(rows).transpose()
}

pub fn unproject(screen: ScreenPos, inverse: &Matrix4<f64>) -> Result<Ray> {
    unproject_with(screen, inverse, Tolerance::default())
}

/// Casts the ray under `screen` by mapping the same canvas position at normalized
/// depth 0 (near) and 1 (far) through `inverse` into world space.
pub fn unproject_with(screen: ScreenPos, inverse: &Matrix4<f64>, tol: Tolerance) -> Result<Ray> {
    let near = to_world(inverse, screen, 0.0, tol)?;
    let far = to_world(inverse, screen, 1.0, tol)?;
    Ray::with_tolerance(near, far - near, tol.direction)
}

fn to_world(inverse: &Matrix4<f64>, screen: ScreenPos, depth: f64, tol: Tolerance) -> Result<Vec3> {
    let mapped = *inverse * Vector4::new(screen.x, screen.y, depth, 1.0);
    let point = Vec3::new(mapped.x, mapped.y, mapped.z);
    if mapped.w == 1.0 {
        return Ok(point);
    }
    if !mapped.w.is_finite() || mapped.w.abs() <= tol.direction {
        return Err(Error::DegenerateTransform);
    }
    Ok(point / mapped.w)
}
