//! Snake body physics
//!
//! The body is a chain of particles held together by distance constraints
//! and advanced with position-based dynamics. This module must stay pure:
//! - Fixed timestep only
//! - No global state
//! - Stable iteration order (by particle index)

pub mod arena;
pub mod body;
pub mod collision;
pub mod particle;
pub mod solver;

pub use arena::Arena;
pub use body::{Body, BodyConfig};
pub use collision::{Correction, circles_overlap, distance_correction, pairwise_overlap, point_in_chain, self_collision};
pub use particle::{Constraint, Particle};
pub use solver::{PhysicsSolver, SolverConfig, substep_stiffness};
