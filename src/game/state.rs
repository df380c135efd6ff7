//! Game state and gameplay entities
//!
//! Everything the fixed-step tick reads or writes lives here. Timers are
//! counted in ticks so a run is reproducible from its seed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::stats::GameStats;
use crate::consts::HEADING_MAGNITUDE;
use crate::settings::Settings;
use crate::sim::{Arena, Body, PhysicsSolver};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Snake is alive
    Playing,
    /// Run ended
    GameOver,
}

/// Keyboard steering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Steering vector (screen space, y grows downward)
    pub fn direction(self) -> Vec2 {
        match self {
            Heading::Up => Vec2::new(0.0, -HEADING_MAGNITUDE),
            Heading::Down => Vec2::new(0.0, HEADING_MAGNITUDE),
            Heading::Left => Vec2::new(-HEADING_MAGNITUDE, 0.0),
            Heading::Right => Vec2::new(HEADING_MAGNITUDE, 0.0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    /// Heading along the dominant axis of `delta`
    pub fn toward(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 { Heading::Right } else { Heading::Left }
        } else if delta.y > 0.0 {
            Heading::Down
        } else {
            Heading::Up
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Hostile,
}

/// Gameplay tuning (distances in world units, times in ticks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub food_size: f32,
    pub max_enemies: usize,
    pub enemy_size: f32,
    /// Units per tick while flying in
    pub enemy_approach_speed: f32,
    pub enemy_spawn_ticks: u64,
    pub enemy_fire_ticks: u64,
    /// Particles lost on contact with an enemy
    pub enemy_contact_damage: usize,
    pub projectile_size: f32,
    pub projectile_damage: usize,
    /// Units per tick
    pub projectile_speed: f32,
    pub player_fire_ticks: u64,
    /// Score for ramming an enemy, by length band (< 5, < 7, longer)
    pub contact_scores: [f32; 3],
    /// Score for shooting an enemy, by length band (< 5, < 7, longer)
    pub kill_scores: [f32; 3],
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            food_size: 0.12,
            max_enemies: 3,
            enemy_size: 0.45,
            enemy_approach_speed: 0.02,
            enemy_spawn_ticks: 3 * 64,
            enemy_fire_ticks: 112,
            enemy_contact_damage: 2,
            projectile_size: 0.1,
            projectile_damage: 1,
            projectile_speed: 0.025,
            player_fire_ticks: 10,
            contact_scores: [0.5, 1.0, 1.75],
            kill_scores: [1.0, 2.0, 3.0],
        }
    }
}

impl GameTuning {
    /// Pick the score for a snake of `length` from a band table
    pub fn banded(scores: &[f32; 3], length: usize) -> f32 {
        match length {
            0..5 => scores[0],
            5..7 => scores[1],
            _ => scores[2],
        }
    }
}

/// A food pellet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub pos: Vec2,
    pub size: f32,
}

/// An enemy ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Where the ship settles
    pub target: Vec2,
    pub size: f32,
    /// Settled at its target; only settled ships fire or ram
    pub in_position: bool,
    pub last_fire_tick: u64,
}

impl Enemy {
    /// Fly toward the target, snapping once within `speed` on both axes
    pub fn approach(&mut self, speed: f32) {
        if self.in_position {
            return;
        }
        let dir = (self.target - self.pos).normalize_or_zero();
        self.pos += dir * speed;

        let gap = (self.target - self.pos).abs();
        if gap.x < speed && gap.y < speed {
            self.pos = self.target;
            self.in_position = true;
        }
    }
}

/// A straight-line projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub size: f32,
    pub damage: usize,
    pub faction: Faction,
}

impl Projectile {
    /// Launch from `origin` toward `target`
    pub fn aimed(origin: Vec2, target: Vec2, speed: f32, size: f32, damage: usize, faction: Faction) -> Self {
        let delta = target - origin;
        let angle = delta.y.atan2(delta.x);
        Self {
            pos: origin,
            vel: Vec2::from_angle(angle) * speed,
            size,
            damage,
            faction,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub arena: Arena,
    pub tuning: GameTuning,
    pub solver: PhysicsSolver,
    pub snake: Body,
    /// Last keyboard heading applied to the snake
    pub heading: Option<Heading>,
    pub food: Food,
    /// Active enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub stats: GameStats,
    pub last_enemy_spawn_tick: u64,
    pub last_player_fire_tick: u64,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let food = Food {
            pos: settings.arena.random_point(&mut rng, settings.tuning.food_size),
            size: settings.tuning.food_size,
        };
        Self {
            seed,
            phase: GamePhase::Playing,
            time_ticks: 0,
            arena: settings.arena,
            solver: PhysicsSolver::new(settings.solver, settings.arena),
            snake: Body::new(settings.body),
            heading: None,
            food,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            stats: GameStats::new(),
            last_enemy_spawn_tick: 0,
            last_player_fire_tick: 0,
            tuning: settings.tuning,
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Move the food somewhere new
    pub fn respawn_food(&mut self) {
        self.food.pos = self.arena.random_point(&mut self.rng, self.food.size);
    }

    /// Spawn an enemy above the arena, headed for a random spot inside it
    pub fn spawn_enemy(&mut self) {
        let id = self.next_entity_id();
        let size = self.tuning.enemy_size;
        let target = self.arena.random_point(&mut self.rng, size);
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(0.0, self.arena.top - 2.0 * size),
            target,
            size,
            in_position: false,
            last_fire_tick: self.time_ticks,
        });
        self.last_enemy_spawn_tick = self.time_ticks;
        log::debug!("Enemy {} spawned, heading for {}", id, target);
    }

    /// Fire a player projectile toward `target` if the cooldown allows
    ///
    /// Returns whether a shot was fired.
    pub fn player_fire(&mut self, target: Vec2) -> bool {
        if !self.snake.is_alive() || self.time_ticks - self.last_player_fire_tick < self.tuning.player_fire_ticks {
            return false;
        }
        self.last_player_fire_tick = self.time_ticks;

        let head = self.snake.head_position();
        let origin = head + (target - head) * 0.1;
        self.projectiles.push(Projectile::aimed(
            origin,
            target,
            self.tuning.projectile_speed,
            self.tuning.projectile_size,
            self.tuning.projectile_damage,
            Faction::Player,
        ));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(42, Settings::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.snake.particle_count(), 3);
        assert!(state.enemies.is_empty());
        assert!(state.arena.contains(state.food.pos));
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameState::new(7, Settings::default());
        let b = GameState::new(7, Settings::default());
        assert_eq!(a.food, b.food);
    }

    #[test]
    fn test_heading_vectors() {
        assert_eq!(Heading::Up.direction(), Vec2::new(0.0, -0.25));
        assert_eq!(Heading::Right.direction(), Vec2::new(0.25, 0.0));
        assert_eq!(Heading::Left.opposite(), Heading::Right);
        assert_eq!(Heading::toward(Vec2::new(-3.0, 1.0)), Heading::Left);
        assert_eq!(Heading::toward(Vec2::new(0.5, 1.0)), Heading::Down);
    }

    #[test]
    fn test_enemy_approach_snaps_to_target() {
        let mut enemy = Enemy {
            id: 1,
            pos: Vec2::new(0.0, -5.9),
            target: Vec2::new(0.0, -5.0),
            size: 0.45,
            in_position: false,
            last_fire_tick: 0,
        };
        let mut ticks = 0;
        while !enemy.in_position {
            enemy.approach(0.02);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(enemy.pos, enemy.target);
        assert!(ticks >= 44);
    }

    #[test]
    fn test_aimed_projectile() {
        let p = Projectile::aimed(Vec2::ZERO, Vec2::new(0.0, 2.0), 0.025, 0.1, 1, Faction::Hostile);
        assert!((p.vel - Vec2::new(0.0, 0.025)).length() < 1e-6);

        // Zero-length aim fires along +x
        let p = Projectile::aimed(Vec2::ONE, Vec2::ONE, 0.025, 0.1, 1, Faction::Player);
        assert!((p.vel - Vec2::new(0.025, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_player_fire_cooldown() {
        let mut state = GameState::new(1, Settings::default());
        assert!(!state.player_fire(Vec2::ZERO));

        state.time_ticks = 10;
        assert!(state.player_fire(Vec2::ZERO));
        assert!(!state.player_fire(Vec2::ZERO));
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].faction, Faction::Player);
    }

    #[test]
    fn test_banded_scores() {
        let t = GameTuning::default();
        assert_eq!(GameTuning::banded(&t.kill_scores, 3), 1.0);
        assert_eq!(GameTuning::banded(&t.kill_scores, 6), 2.0);
        assert_eq!(GameTuning::banded(&t.kill_scores, 9), 3.0);
        assert_eq!(GameTuning::banded(&t.contact_scores, 4), 0.5);
    }
}
