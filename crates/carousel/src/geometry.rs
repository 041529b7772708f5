use derive_more::{Add, From, Into, Sub};
use std::f64::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Default, Add, Sub, From, Into)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn polar(radius: f64, angle: f64) -> Self {
        Self::new(radius * angle.cos(), radius * angle.sin())
    }

    /// Direction of the point seen from the origin, in `(-PI, PI]`.
    pub fn direction(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

/// Wraps an unbounded angle into `[0, TAU)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Shortest distance between two angles around the circle, in `[0, PI]`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    ((a - b + PI).rem_euclid(TAU) - PI).abs()
}
