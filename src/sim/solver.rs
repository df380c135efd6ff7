//! Position-based dynamics step for the snake body
//!
//! One call to [`PhysicsSolver::advance`] is one fixed tick:
//! 1. Head is displaced kinematically by the steering direction
//! 2. Tail particles coast on damped velocity
//! 3. Overlapping particles are pushed apart (once)
//! 4. Links are relaxed over several substeps of growing softness
//! 5. Velocity is re-derived from the positional change and committed
//!
//! Separation runs before relaxation, so relaxation may leave a little
//! overlap behind. The chain is soft, not impenetrable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::Body;
use super::collision::{self, Correction};
use super::particle::{Constraint, Particle};
use crate::consts::*;

/// Solver tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Head displacement per second at unit steering
    pub head_speed: f32,
    /// Per-tick velocity retention of tail particles
    pub friction: f32,
    /// Relaxation substeps per tick
    pub substeps: u32,
    /// Damping removed from every link correction
    pub correction_damping: f32,
    /// Fraction of an overlap removed by separation
    pub separation_factor: f32,
    /// Stiffness of [`PhysicsSolver::correct_distance`]
    pub distance_correction_stiffness: f32,
    /// Run separation a second time after relaxation
    pub trailing_separation: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            head_speed: HEAD_SPEED,
            friction: TAIL_FRICTION,
            substeps: RELAX_SUBSTEPS,
            correction_damping: CORRECTION_DAMPING,
            separation_factor: SEPARATION_FACTOR,
            distance_correction_stiffness: DISTANCE_CORRECTION_STIFFNESS,
            trailing_separation: false,
        }
    }
}

/// Effective stiffness of substep `substep` (1-indexed) for a link of `base` stiffness
#[inline]
pub fn substep_stiffness(base: f32, substep: u32) -> f32 {
    1.0 - (1.0 - base).powf(1.0 / substep as f32)
}

/// Advances a [`Body`] one tick at a time
#[derive(Debug, Clone, Default)]
pub struct PhysicsSolver {
    pub config: SolverConfig,
    /// The head dies outside these bounds
    pub bounds: Arena,
}

impl PhysicsSolver {
    pub fn new(config: SolverConfig, bounds: Arena) -> Self {
        Self { config, bounds }
    }

    /// Steer the body and advance it one tick
    pub fn advance(&self, body: &mut Body, direction: Vec2, dt: f32) {
        body.steer(direction);
        self.step(body, dt);
    }

    /// Advance one tick with the body's stored steering
    ///
    /// Dead bodies are left untouched.
    pub fn step(&self, body: &mut Body, dt: f32) {
        if !body.is_alive() {
            return;
        }
        debug_assert!(dt > 0.0, "timestep must be positive");

        let direction = body.direction();
        {
            let (particles, constraints) = body.parts_mut();
            self.integrate(particles, direction, dt);
            self.separate(particles);
            for substep in 1..=self.config.substeps {
                self.relax_substep(particles, constraints, substep);
            }
            if self.config.trailing_separation {
                self.separate(particles);
            }
            commit(particles, dt);
        }

        if collision::self_collision(body) {
            log::info!("Body destroyed: head hit its own tail at {}", body.head_position());
            body.kill();
        } else if !self.bounds.contains(body.head_position()) {
            log::info!("Body destroyed: head left the arena at {}", body.head_position());
            body.kill();
        }
    }

    /// Predict positions: kinematic head, damped inertial tail
    pub fn integrate(&self, particles: &mut [Particle], direction: Vec2, dt: f32) {
        let Some((head, tail)) = particles.split_first_mut() else {
            return;
        };
        head.predicted = head.pos + direction * self.config.head_speed * dt;
        for p in tail {
            p.vel *= self.config.friction;
            p.predicted = p.pos + p.vel * dt;
        }
    }

    /// Push every overlapping pair apart (O(n²))
    pub fn separate(&self, particles: &mut [Particle]) {
        let n = particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let c = collision::pairwise_overlap(&particles[i], &particles[j], self.config.separation_factor);
                apply(particles, i, j, c);
            }
        }
    }

    /// One relaxation pass over every link
    pub fn relax_substep(&self, particles: &mut [Particle], constraints: &[Constraint], substep: u32) {
        for c in constraints {
            assert!(
                c.a < particles.len() && c.b < particles.len(),
                "link ({}, {}) out of range for {} particles",
                c.a,
                c.b,
                particles.len()
            );
            let stiffness = substep_stiffness(c.stiffness, substep);
            let correction = collision::distance_correction(
                &particles[c.a],
                &particles[c.b],
                c.rest,
                stiffness,
                self.config.correction_damping,
            );
            apply(particles, c.a, c.b, correction);
        }
    }

    /// Ad-hoc distance correction at the configured correction stiffness
    pub fn correct_distance(&self, p1: &Particle, p2: &Particle, rest: f32) -> Correction {
        collision::distance_correction(
            p1,
            p2,
            rest,
            self.config.distance_correction_stiffness,
            self.config.correction_damping,
        )
    }
}

#[inline]
fn apply(particles: &mut [Particle], a: usize, b: usize, correction: Correction) {
    particles[a].predicted += correction.a;
    particles[b].predicted += correction.b;
}

/// Derive velocity from the positional change and commit it
fn commit(particles: &mut [Particle], dt: f32) {
    for p in particles {
        p.vel = (p.predicted - p.pos) / dt;
        p.pos = p.predicted;
    }
}
