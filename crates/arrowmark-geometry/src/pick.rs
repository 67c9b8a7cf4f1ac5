use arrowmark_base::{Tolerance, Vec3};

use crate::Ray;

/// Parameters and points where two rays pass closest to each other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestApproach {
    pub t: f64,
    pub s: f64,
    pub first: Vec3,
    pub second: Vec3,
}

impl ClosestApproach {
    pub fn midpoint(&self) -> Vec3 {
        (self.first + self.second) * 0.5
    }

    pub fn gap(&self) -> f64 {
        self.first.distance(self.second)
    }
}

/// Solves the normal equations for `p1 + t*d1` and `p2 + s*d2`.
///
/// Returns `None` when the rays are parallel within `tol.parallel`, scaled by
/// `|d1|^2 |d2|^2`.
pub fn closest_approach(first: &Ray, second: &Ray, tol: Tolerance) -> Option<ClosestApproach> {
    let (p1, d1) = (first.origin(), first.direction());
    let (p2, d2) = (second.origin(), second.direction());

    let w0 = p1 - p2;
    let a = d1.dot(d1);
    let b = d1.dot(d2);
    let c = d2.dot(d2);
    let d = d1.dot(w0);
    let e = d2.dot(w0);

    let denom = a * c - b * b;
    if denom.abs() <= tol.parallel * (a * c) {
        return None;
    }

    let t = (b * e - c * d) / denom;
    let s = (a * e - b * d) / denom;
    Some(ClosestApproach {
        t,
        s,
        first: first.at(t),
        second: second.at(s),
    })
}

pub fn triangulate(first: &Ray, second: &Ray) -> Option<Vec3> {
    triangulate_with(first, second, Tolerance::default())
}

pub fn triangulate_with(first: &Ray, second: &Ray, tol: Tolerance) -> Option<Vec3> {
    closest_approach(first, second, tol).map(|hit| hit.midpoint())
}
