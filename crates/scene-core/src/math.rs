//! Minimal 2D vector math for scene positions.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D position or offset in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared length, avoiding the square root for distance comparisons.
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_length_of_displacement() {
        let start = Vec2::new(1.0, 2.0);
        let end = Vec2::new(4.0, 6.0);
        assert_eq!((end - start).length_squared(), 25.0);
    }

    #[test]
    fn add_and_sub_are_componentwise() {
        let a = Vec2::new(1.0, -2.0);
        let b = Vec2::new(0.5, 3.0);
        assert_eq!(a + b, Vec2::new(1.5, 1.0));
        assert_eq!(a - b, Vec2::new(0.5, -5.0));
    }
}
