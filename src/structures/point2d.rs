/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

const EPSILON: f64 = f64::EPSILON;

/// A 2-D point, with x and y fields.
#[derive(Default, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Point2D {
    /// Creates a new Point2D.
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }

    /// Calculates the midpoint between two Point2Ds.
    pub fn midpoint(p1: &Point2D, p2: &Point2D) -> Point2D {
        Point2D::new((p1.x + p2.x) / 2f64, (p1.y + p2.y) / 2f64)
    }

    /// Calculate Euclidean distance between the point and another.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance between the point and another.
    pub fn distance_squared(&self, other: &Self) -> f64 {
        (self.x - other.x) * (self.x - other.x) + (self.y - other.y) * (self.y - other.y)
    }

    /// 2-D cross product of this and another point, treated as vectors.
    pub fn cross(&self, other: Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Tests if this point is Left|On|Right of the infinite line passing
    /// through p0 and p1. Returns > 0 when left, 0 when on, < 0 when right.
    pub fn is_left(&self, p0: &Point2D, p1: &Point2D) -> f64 {
        (p1.x - p0.x) * (self.y - p0.y) - (self.x - p0.x) * (p1.y - p0.y)
    }

    /// Tests coordinate equality within machine epsilon.
    pub fn nearly_equals(&self, other: &Self) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
    }

    /// Tests whether the point lies on the segment connecting a and b,
    /// the point being already known to be on the line through a and b.
    pub fn is_between(&self, a: &Point2D, b: &Point2D) -> bool {
        if a.x != b.x {
            // not a vertical segment
            (a.x <= self.x && self.x <= b.x) || (a.x >= self.x && self.x >= b.x)
        } else {
            (a.y <= self.y && self.y <= b.y) || (a.y >= self.y && self.y >= b.y)
        }
    }

    /// Rounds the coordinates to a fixed number of decimal places. Used to
    /// bring coordinates computed along two different lines onto matching
    /// grid positions before comparison.
    pub fn fix_precision(&self, num_decimals: i32) -> Point2D {
        let scale = 10f64.powi(num_decimals);
        Point2D::new(
            (self.x * scale).round() / scale,
            (self.y * scale).round() / scale,
        )
    }

    pub fn translate(&self, delta_x: f64, delta_y: f64) -> Point2D {
        Point2D::new(self.x + delta_x, self.y + delta_y)
    }
}

impl Eq for Point2D {}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, rhs: Self) -> Point2D {
        Point2D {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, rhs: Self) -> Point2D {
        Point2D {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

// dot product
impl Mul for Point2D {
    type Output = f64;
    fn mul(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }
}
