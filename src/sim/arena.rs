//! Rectangular world bounds
//!
//! Screen space convention: `top` is the smaller y value, `bottom` the larger.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            left: ARENA_LEFT,
            right: ARENA_RIGHT,
            top: ARENA_TOP,
            bottom: ARENA_BOTTOM,
        }
    }
}

impl Arena {
    /// Bounds that contain every finite point
    pub const UNBOUNDED: Arena = Arena {
        left: f32::NEG_INFINITY,
        right: f32::INFINITY,
        top: f32::NEG_INFINITY,
        bottom: f32::INFINITY,
    };

    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Uniform random point at least `inset` away from every edge
    pub fn random_point<R: Rng>(&self, rng: &mut R, inset: f32) -> Vec2 {
        let (min_x, max_x) = (self.left + inset, self.right - inset);
        let (min_y, max_y) = (self.top + inset, self.bottom - inset);
        // Degenerate ranges collapse to the centre line
        let x = if min_x < max_x {
            rng.random_range(min_x..max_x)
        } else {
            (self.left + self.right) * 0.5
        };
        let y = if min_y < max_y {
            rng.random_range(min_y..max_y)
        } else {
            (self.top + self.bottom) * 0.5
        };
        Vec2::new(x, y)
    }
}
