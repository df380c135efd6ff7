//! Deterministic headless gameplay
//!
//! Food, enemies, projectiles and scoring built around the snake body. All
//! hit-testing goes through the `sim` collision queries; damage and growth
//! are reported back through `Body::shrink` / `Body::grow`.

pub mod state;
pub mod stats;
pub mod tick;

pub use state::{Enemy, Faction, Food, GamePhase, GameState, GameTuning, Heading, Projectile};
pub use stats::GameStats;
pub use tick::{TickInput, tick};
