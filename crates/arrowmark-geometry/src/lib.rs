use thiserror::Error;

mod pick;
mod ray;

pub use arrowmark_base::{Tolerance, Vec3};
pub use cgmath::Matrix4;
pub use pick::{ClosestApproach, closest_approach, triangulate, triangulate_with};
pub use ray::{Ray, ScreenPos, matrix_from_rows, unproject, unproject_with};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("screen-to-world transform is degenerate along the view axis")]
    DegenerateTransform,
    #[error("rays are parallel; no unique closest point")]
    ParallelRays,
}

pub type Result<T> = std::result::Result<T, Error>;
