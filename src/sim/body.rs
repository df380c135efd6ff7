//! The snake body: an ordered particle chain and its links
//!
//! Particles are identified by their index (0 = head). Constraint `i` always
//! links particle `i` to particle `i + 1`, so every change to the particle
//! count rewrites the constraint list in the same call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision;
use super::particle::{Constraint, Particle};
use crate::consts::*;

/// Construction parameters for a [`Body`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub initial_length: usize,
    pub radius: f32,
    /// Spawn spacing between neighbours
    pub initial_spacing: f32,
    /// Rest distance of every link
    pub rest_distance: f32,
    /// Base stiffness of every link
    pub stiffness: f32,
    /// Head position at spawn; the tail extends along -x
    pub origin: Vec2,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            initial_length: INITIAL_LENGTH,
            radius: PARTICLE_RADIUS,
            initial_spacing: PARTICLE_RADIUS * INITIAL_SPACING_FACTOR,
            rest_distance: PARTICLE_RADIUS * REST_SPACING_FACTOR,
            stiffness: CHAIN_STIFFNESS,
            origin: Vec2::new(0.0, ARENA_TOP + 3.0 * PARTICLE_RADIUS),
        }
    }
}

/// A growing/shrinking particle chain
///
/// Snapshots deserialize through [`BodySnapshot`], so a malformed chain is
/// rejected instead of reaching the solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BodySnapshot")]
pub struct Body {
    particles: Vec<Particle>,
    constraints: Vec<Constraint>,
    /// Steering consumed by the next solver step
    direction: Vec2,
    alive: bool,
    config: BodyConfig,
}

impl Body {
    pub fn new(config: BodyConfig) -> Self {
        let mut body = Self {
            particles: Vec::with_capacity(config.initial_length),
            constraints: Vec::with_capacity(config.initial_length.saturating_sub(1)),
            direction: Vec2::ZERO,
            alive: true,
            config,
        };
        body.initialize(config.initial_length, config.initial_spacing);
        body
    }

    /// Reset to `length` colinear particles spaced `spacing` apart, head at the origin
    pub fn initialize(&mut self, length: usize, spacing: f32) {
        assert!(length > 0, "a body needs at least one particle");

        let config = self.config;
        self.particles.clear();
        self.particles.extend(
            (0..length).map(|i| Particle::new(config.origin - Vec2::X * (i as f32 * spacing), config.radius)),
        );
        self.constraints.clear();
        self.constraints.extend((0..length - 1).map(|i| Self::link(&config, i)));
        self.direction = Vec2::ZERO;
        self.alive = true;

        self.check_topology();
    }

    fn link(config: &BodyConfig, index: usize) -> Constraint {
        Constraint::link(index, config.rest_distance).with_stiffness(config.stiffness)
    }

    /// Append one particle on top of the tail, linked at rest distance
    pub fn grow(&mut self) {
        if !self.alive {
            return;
        }
        let tail = self.particles[self.particles.len() - 1];
        self.particles.push(Particle::new(tail.pos, tail.radius));
        let link = Self::link(&self.config, self.particles.len() - 2);
        self.constraints.push(link);
        self.check_topology();
        log::debug!("Body grew to {} particles", self.particles.len());
    }

    /// Remove `k` particles from the tail, or die if that would leave nothing
    ///
    /// A dead body's particles are left as they were; check [`Body::is_alive`]
    /// before relying on them.
    pub fn shrink(&mut self, k: usize) {
        if !self.alive {
            return;
        }
        let len = self.particles.len();
        if len > k {
            self.particles.truncate(len - k);
            self.constraints.truncate(len - k - 1);
            self.check_topology();
            log::debug!("Body shrank by {} to {} particles", k, self.particles.len());
        } else {
            log::info!("Body destroyed: shrink by {} with only {} particles", k, len);
            self.alive = false;
        }
    }

    /// Store the steering direction for the next solver step
    pub fn steer(&mut self, direction: Vec2) {
        self.direction = direction;
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    #[inline]
    pub fn head_position(&self) -> Vec2 {
        self.particles[0].pos
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    /// Whether a circle at `(x, y)` with radius `r` touches any particle
    pub fn check_point_collision(&self, x: f32, y: f32, r: f32) -> bool {
        collision::point_in_chain(self, Vec2::new(x, y), r)
    }

    /// Move particle `index` to `pos` and clear its motion
    pub fn teleport(&mut self, index: usize, pos: Vec2) {
        self.particles[index].teleport(pos);
    }

    /// Largest `|current - rest|` over all links
    pub fn max_violation(&self) -> f32 {
        self.constraints
            .iter()
            .map(|c| c.violation(&self.particles).abs())
            .fold(0.0, f32::max)
    }

    /// Split borrow for the solver
    pub(crate) fn parts_mut(&mut self) -> (&mut [Particle], &[Constraint]) {
        (&mut self.particles, &self.constraints)
    }

    /// Panics if the chain links are out of step with the particles
    fn check_topology(&self) {
        if let Err(reason) = validate_chain(&self.particles, &self.constraints) {
            panic!("{reason}");
        }
    }
}

/// Serialized form of a [`Body`], checked before it becomes one
#[derive(Deserialize)]
struct BodySnapshot {
    particles: Vec<Particle>,
    constraints: Vec<Constraint>,
    direction: Vec2,
    alive: bool,
    config: BodyConfig,
}

impl TryFrom<BodySnapshot> for Body {
    type Error = String;

    fn try_from(snapshot: BodySnapshot) -> Result<Self, Self::Error> {
        validate_chain(&snapshot.particles, &snapshot.constraints)?;
        Ok(Self {
            particles: snapshot.particles,
            constraints: snapshot.constraints,
            direction: snapshot.direction,
            alive: snapshot.alive,
            config: snapshot.config,
        })
    }
}

/// Non-empty, one link fewer than particles, link `i` joining `i` and `i + 1`
fn validate_chain(particles: &[Particle], constraints: &[Constraint]) -> Result<(), String> {
    if particles.is_empty() {
        return Err("a body needs at least one particle".to_string());
    }
    if constraints.len() + 1 != particles.len() {
        return Err(format!(
            "chain of {} particles must have {} links, found {}",
            particles.len(),
            particles.len() - 1,
            constraints.len()
        ));
    }
    for (i, c) in constraints.iter().enumerate() {
        if c.a != i || c.b != i + 1 {
            return Err(format!(
                "link {} references ({}, {}) in a chain of {}",
                i,
                c.a,
                c.b,
                particles.len()
            ));
        }
    }
    Ok(())
}
