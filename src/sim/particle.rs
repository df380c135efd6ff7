//! Point masses and the distance constraints that link them

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CHAIN_STIFFNESS;

/// A point mass in the snake chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Committed position
    pub pos: Vec2,
    /// Working position during a tick (written by the solver only)
    pub predicted: Vec2,
    /// Derived velocity (written by the solver only)
    pub vel: Vec2,
    pub radius: f32,
    /// 0 = pinned
    pub inv_mass: f32,
}

impl Particle {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            predicted: pos,
            vel: Vec2::ZERO,
            radius,
            inv_mass: 1.0,
        }
    }

    /// An immovable particle
    pub fn pinned(pos: Vec2, radius: f32) -> Self {
        Self {
            inv_mass: 0.0,
            ..Self::new(pos, radius)
        }
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Place the particle at `pos` with no motion
    pub fn teleport(&mut self, pos: Vec2) {
        self.pos = pos;
        self.predicted = pos;
        self.vel = Vec2::ZERO;
    }
}

/// Distance constraint between two particles of the same body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub a: usize,
    pub b: usize,
    /// Target separation
    pub rest: f32,
    pub stiffness: f32,
}

impl Constraint {
    pub fn new(a: usize, b: usize, rest: f32) -> Self {
        Self {
            a,
            b,
            rest,
            stiffness: CHAIN_STIFFNESS,
        }
    }

    /// Chain link between particle `index` and its successor
    pub fn link(index: usize, rest: f32) -> Self {
        Self::new(index, index + 1, rest)
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Signed violation (`current - rest`) measured on committed positions
    pub fn violation(&self, particles: &[Particle]) -> f32 {
        particles[self.a].pos.distance(particles[self.b].pos) - self.rest
    }

    /// Signed violation measured on predicted positions
    pub fn predicted_violation(&self, particles: &[Particle]) -> f32 {
        particles[self.a].predicted.distance(particles[self.b].predicted) - self.rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_particle_is_movable_and_at_rest() {
        let p = Particle::new(Vec2::new(1.0, 2.0), 0.1);
        assert_eq!(p.predicted, p.pos);
        assert_eq!(p.vel, Vec2::ZERO);
        assert!(!p.is_pinned());
    }

    #[test]
    fn test_pinned_particle_has_zero_inverse_mass() {
        let p = Particle::pinned(Vec2::ZERO, 0.1);
        assert!(p.is_pinned());
        assert_eq!(p.radius, 0.1);
    }

    #[test]
    fn test_link_uses_chain_stiffness() {
        let c = Constraint::link(3, 0.25);
        assert_eq!((c.a, c.b), (3, 4));
        assert_eq!(c.stiffness, CHAIN_STIFFNESS);
        assert_eq!(c.with_stiffness(0.5).stiffness, 0.5);
    }

    #[test]
    fn test_violation_sign() {
        let particles = [
            Particle::new(Vec2::ZERO, 0.1),
            Particle::new(Vec2::new(0.3, 0.0), 0.1),
        ];
        let c = Constraint::link(0, 0.25);
        assert!((c.violation(&particles) - 0.05).abs() < 1e-6);

        let c = Constraint::link(0, 0.4);
        assert!(c.violation(&particles) < 0.0);
    }
}
