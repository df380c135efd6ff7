//! Overlap corrections and hit tests for the particle chain
//!
//! Everything here is pure: functions read particles and return either a
//! verdict or a pair of position deltas for the caller to apply. The solver
//! uses the corrections; gameplay code uses the hit tests.

use glam::Vec2;

use super::body::Body;
use super::particle::Particle;
use crate::separation_axis;

/// Position deltas for a pair of particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Delta for the first particle
    pub a: Vec2,
    /// Delta for the second particle
    pub b: Vec2,
}

impl Correction {
    pub const NONE: Correction = Correction {
        a: Vec2::ZERO,
        b: Vec2::ZERO,
    };

    #[inline]
    pub fn is_none(&self) -> bool {
        self.a == Vec2::ZERO && self.b == Vec2::ZERO
    }
}

/// Push two overlapping particles apart
///
/// Measured on committed positions. `factor` is the fraction of the overlap
/// removed, split between the pair by inverse mass. Coincident particles
/// separate along the fallback axis.
pub fn pairwise_overlap(p1: &Particle, p2: &Particle, factor: f32) -> Correction {
    let (axis, dist) = separation_axis(p1.pos, p2.pos);
    let radii = p1.radius + p2.radius;
    if dist >= radii {
        return Correction::NONE;
    }

    let total_inv_mass = p1.inv_mass + p2.inv_mass;
    if total_inv_mass == 0.0 {
        return Correction::NONE;
    }

    let push = factor * (radii - dist) / total_inv_mass;
    Correction {
        a: axis * (p1.inv_mass * push),
        b: -axis * (p2.inv_mass * push),
    }
}

/// Pull or push two particles toward separation `rest`
///
/// Measured on committed positions and weighted by inverse mass. The result
/// is scaled by `stiffness * (1 - damping)`.
pub fn distance_correction(p1: &Particle, p2: &Particle, rest: f32, stiffness: f32, damping: f32) -> Correction {
    let (axis, dist) = separation_axis(p1.pos, p2.pos);
    let total_inv_mass = p1.inv_mass + p2.inv_mass;
    if total_inv_mass == 0.0 {
        return Correction::NONE;
    }

    let step = (dist - rest) * stiffness * (1.0 - damping) / total_inv_mass;
    Correction {
        a: -axis * (p1.inv_mass * step),
        b: axis * (p2.inv_mass * step),
    }
}

/// Whether two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Whether a circle at `point` with radius `r` touches any particle of the chain
pub fn point_in_chain(body: &Body, point: Vec2, r: f32) -> bool {
    body.particles()
        .iter()
        .any(|p| circles_overlap(point, r, p.pos, p.radius))
}

/// Whether the head overlaps any particle past its immediate neighbour
pub fn self_collision(body: &Body) -> bool {
    let particles = body.particles();
    let Some(head) = particles.first() else {
        return false;
    };
    particles
        .iter()
        .skip(2)
        .any(|p| circles_overlap(head.pos, head.radius, p.pos, p.radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyConfig;

    fn particle(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), 0.1)
    }

    #[test]
    fn test_pairwise_overlap_separates_symmetrically() {
        let p1 = particle(0.0, 0.0);
        let p2 = particle(0.1, 0.0);
        let c = pairwise_overlap(&p1, &p2, 0.4);

        // overlap 0.1, push = 0.4 * 0.1 / 2
        assert!((c.a - Vec2::new(-0.02, 0.0)).length() < 1e-6);
        assert!((c.b - Vec2::new(0.02, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_pairwise_overlap_clear_pair_is_none() {
        let c = pairwise_overlap(&particle(0.0, 0.0), &particle(0.2, 0.0), 0.4);
        assert!(c.is_none());
    }

    #[test]
    fn test_pairwise_overlap_coincident_uses_fallback_axis() {
        let c = pairwise_overlap(&particle(1.0, 1.0), &particle(1.0, 1.0), 0.5);
        assert!(c.a.x > 0.0 && c.a.y == 0.0);
        assert!(c.b.x < 0.0 && c.b.y == 0.0);
        assert!(c.a.is_finite() && c.b.is_finite());
    }

    #[test]
    fn test_pairwise_overlap_pinned_partner_takes_nothing() {
        let p1 = particle(0.0, 0.0);
        let p2 = Particle::pinned(Vec2::new(0.1, 0.0), 0.1);
        let c = pairwise_overlap(&p1, &p2, 1.0);
        assert_eq!(c.b, Vec2::ZERO);
        assert!((c.a.x + 0.1).abs() < 1e-6);

        let both = pairwise_overlap(&p2, &p2, 1.0);
        assert!(both.is_none());
    }

    #[test]
    fn test_distance_correction_pulls_stretched_pair() {
        let p1 = particle(0.0, 0.0);
        let p2 = particle(0.5, 0.0);
        let c = distance_correction(&p1, &p2, 0.25, 0.8, 0.1);

        // violation 0.25 * 0.8 * 0.9 / 2 per side
        assert!((c.a.x - 0.09).abs() < 1e-6);
        assert!((c.b.x + 0.09).abs() < 1e-6);
    }

    #[test]
    fn test_distance_correction_pushes_compressed_pair() {
        let c = distance_correction(&particle(0.0, 0.0), &particle(0.0, 0.1), 0.25, 1.0, 0.0);
        assert!(c.a.y < 0.0);
        assert!(c.b.y > 0.0);
    }

    #[test]
    fn test_point_in_chain() {
        let body = Body::new(BodyConfig::default());
        let tail = body.particles()[2].pos;
        assert!(point_in_chain(&body, tail + Vec2::new(0.0, 0.25), 0.2));
        assert!(!point_in_chain(&body, tail + Vec2::new(0.0, 0.35), 0.2));
    }

    #[test]
    fn test_self_collision_excludes_neighbour() {
        let mut body = Body::new(BodyConfig::default());
        let p1 = body.particles()[1].pos;
        let p2 = body.particles()[2].pos;

        // Head overlapping its neighbour is not a collision
        body.teleport(0, p1 + Vec2::new(0.0, 0.05));
        assert!(!self_collision(&body));

        // Head overlapping the second particle is
        body.teleport(0, p2 + Vec2::new(0.0, 0.15));
        assert!(self_collision(&body));
    }
}
