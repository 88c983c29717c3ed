//! Plane geometry between two pointer positions.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Component-wise difference `p1 - p2`.
pub fn lines(p1: Point, p2: Point) -> (f64, f64) {
    (p1.x - p2.x, p1.y - p2.y)
}

pub fn distance(p1: Point, p2: Point) -> f64 {
    let (x, y) = lines(p1, p2);
    (x * x + y * y).sqrt()
}

/// Whole degrees in `[0, 360]`, measured from the vertical axis:
/// `atan2` takes the x difference first. Thresholds are tuned to this.
pub fn angle(p1: Point, p2: Point) -> f64 {
    let (x, y) = lines(p1, p2);
    180.0 + x.atan2(y).to_degrees().round()
}

/// Signed difference `to - from` along the shorter arc, in `(-180, 180]`.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}
