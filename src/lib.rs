//! Serpent - An arcade snake driven by position-based dynamics
//!
//! Core modules:
//! - `sim`: Particle chain, PBD solver and collision queries (the snake body)
//! - `game`: Deterministic headless gameplay (food, enemies, projectiles, stats)
//! - `settings`: Data-driven solver and gameplay tuning

pub mod game;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (64 Hz)
    pub const SIM_DT: f32 = 1.0 / 64.0;

    /// Arena bounds (world units)
    pub const ARENA_LEFT: f32 = -5.0;
    pub const ARENA_RIGHT: f32 = 5.0;
    pub const ARENA_TOP: f32 = -5.0;
    pub const ARENA_BOTTOM: f32 = 5.0;

    /// Snake defaults
    pub const PARTICLE_RADIUS: f32 = 0.1;
    pub const INITIAL_LENGTH: usize = 3;
    /// Rest distance between neighbours, in radii
    pub const REST_SPACING_FACTOR: f32 = 2.5;
    /// Spawn spacing between neighbours (2 radii plus 5%)
    pub const INITIAL_SPACING_FACTOR: f32 = 2.0 * 1.05;

    /// Head displacement in units per second at unit steering
    pub const HEAD_SPEED: f32 = 6.4;
    /// Per-tick velocity retention of tail particles
    pub const TAIL_FRICTION: f32 = 0.94;
    /// Relaxation substeps per tick
    pub const RELAX_SUBSTEPS: u32 = 4;
    /// Stiffness of chain constraints inside the solver
    pub const CHAIN_STIFFNESS: f32 = 0.1;
    /// Stiffness of an ad-hoc distance correction
    pub const DISTANCE_CORRECTION_STIFFNESS: f32 = 0.8;
    /// Damping removed from every distance correction
    pub const CORRECTION_DAMPING: f32 = 0.1;
    /// Fraction of overlap removed per tick by collision separation
    pub const SEPARATION_FACTOR: f32 = 0.4;

    /// Magnitude of a keyboard heading
    pub const HEADING_MAGNITUDE: f32 = 0.25;
}

/// Fallback separation axis for coincident points
pub const FALLBACK_AXIS: Vec2 = Vec2::X;

/// Unit vector pointing from `b` to `a`, plus the distance between them.
///
/// Coincident points return [`FALLBACK_AXIS`] and a distance of zero.
#[inline]
pub fn separation_axis(a: Vec2, b: Vec2) -> (Vec2, f32) {
    let delta = a - b;
    let dist = delta.length();
    if dist == 0.0 {
        (FALLBACK_AXIS, 0.0)
    } else {
        (delta / dist, dist)
    }
}

/// Map a pixel position on a `width`×`height` viewport to world coordinates
#[inline]
pub fn screen_to_world(screen: Vec2, width: f32, height: f32) -> Vec2 {
    use consts::*;
    Vec2::new(
        (screen.x / width) * (ARENA_RIGHT - ARENA_LEFT) + ARENA_LEFT,
        (screen.y / height) * (ARENA_BOTTOM - ARENA_TOP) + ARENA_TOP,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separation_axis_points_from_b_to_a() {
        let (axis, dist) = separation_axis(Vec2::new(3.0, 4.0), Vec2::ZERO);
        assert!((dist - 5.0).abs() < 1e-6);
        assert!((axis - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_separation_axis_coincident_uses_fallback() {
        let p = Vec2::new(1.5, -2.0);
        let (axis, dist) = separation_axis(p, p);
        assert_eq!(dist, 0.0);
        assert_eq!(axis, FALLBACK_AXIS);
    }

    #[test]
    fn test_screen_to_world_corners() {
        let top_left = screen_to_world(Vec2::ZERO, 800.0, 800.0);
        assert_eq!(top_left, Vec2::new(-5.0, -5.0));

        let center = screen_to_world(Vec2::new(400.0, 400.0), 800.0, 800.0);
        assert!(center.length() < 1e-6);
    }
}
