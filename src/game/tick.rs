//! Fixed timestep gameplay tick
//!
//! Advances the snake through the solver, then resolves everything else
//! against the updated chain using the collision queries.

use glam::Vec2;

use super::state::{Faction, GamePhase, GameState, GameTuning, Heading, Projectile};
use crate::sim::circles_overlap;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New keyboard heading
    pub heading: Option<Heading>,
    /// Fire toward this world position
    pub fire_at: Option<Vec2>,
    /// Steer toward food and shoot settled enemies
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    state.time_ticks += 1;
    state.stats.advance(dt);

    if let Some(heading) = input.heading {
        state.heading = Some(heading);
        state.snake.steer(heading.direction());
    }
    if let Some(target) = input.fire_at {
        state.player_fire(target);
    }

    state.solver.step(&mut state.snake, dt);
    if !state.snake.is_alive() {
        end_run(state);
        return;
    }

    for projectile in &mut state.projectiles {
        projectile.advance();
    }

    update_enemies(state);
    check_food(state);
    check_projectiles(state);

    if !state.snake.is_alive() {
        end_run(state);
    }
}

fn end_run(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    log::info!(
        "Game over after {} ticks: score {}, length {}",
        state.time_ticks,
        state.stats.score(),
        state.snake.particle_count()
    );
}

/// Fill in steering and firing for demo play
fn autopilot(state: &GameState, input: &mut TickInput) {
    let head = state.snake.head_position();
    let to_food = state.food.pos - head;
    let mut heading = Heading::toward(to_food);

    // A reversal drives the head straight into its own tail
    if state.heading.map(Heading::opposite) == Some(heading) {
        heading = match heading {
            Heading::Left | Heading::Right => {
                if to_food.y > 0.0 { Heading::Down } else { Heading::Up }
            }
            Heading::Up | Heading::Down => {
                if to_food.x > 0.0 { Heading::Right } else { Heading::Left }
            }
        };
    }
    if state.heading != Some(heading) {
        input.heading = Some(heading);
    }

    input.fire_at = state
        .enemies
        .iter()
        .filter(|e| e.in_position)
        .min_by(|a, b| {
            a.pos
                .distance_squared(head)
                .partial_cmp(&b.pos.distance_squared(head))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos);
}

/// Spawn, move, fire and ram
fn update_enemies(state: &mut GameState) {
    if state.enemies.len() < state.tuning.max_enemies
        && state.time_ticks - state.last_enemy_spawn_tick > state.tuning.enemy_spawn_ticks
    {
        state.spawn_enemy();
    }

    let GameState {
        enemies,
        projectiles,
        snake,
        stats,
        tuning,
        time_ticks,
        ..
    } = state;

    let head = snake.head_position();
    for enemy in enemies.iter_mut() {
        enemy.approach(tuning.enemy_approach_speed);
        if enemy.in_position && *time_ticks - enemy.last_fire_tick >= tuning.enemy_fire_ticks {
            enemy.last_fire_tick = *time_ticks;
            projectiles.push(Projectile::aimed(
                enemy.pos,
                head,
                tuning.projectile_speed,
                tuning.projectile_size,
                tuning.projectile_damage,
                Faction::Hostile,
            ));
        }
    }

    enemies.retain(|enemy| {
        if !enemy.in_position || !snake.check_point_collision(enemy.pos.x, enemy.pos.y, enemy.size) {
            return true;
        }
        snake.shrink(tuning.enemy_contact_damage);
        let points = GameTuning::banded(&tuning.contact_scores, snake.particle_count());
        stats.add_score(points);
        log::info!("Enemy {} rammed: -{} segments, +{} score", enemy.id, tuning.enemy_contact_damage, points);
        false
    });
}

/// Grow when the head reaches the food
fn check_food(state: &mut GameState) {
    let head = state.snake.particles()[0];
    if circles_overlap(head.pos, head.radius, state.food.pos, state.snake.config().radius) {
        state.snake.grow();
        state.respawn_food();
        log::info!("Food eaten: length {}", state.snake.particle_count());
    }
}

/// Resolve projectiles against the arena, the snake and the enemies
fn check_projectiles(state: &mut GameState) {
    let GameState {
        projectiles,
        enemies,
        snake,
        stats,
        tuning,
        arena,
        ..
    } = state;

    projectiles.retain(|p| {
        if !arena.contains(p.pos) {
            return false;
        }

        if snake.check_point_collision(p.pos.x, p.pos.y, p.size) {
            return match p.faction {
                Faction::Hostile => {
                    snake.shrink(p.damage);
                    log::debug!("Hit by projectile: length {}", snake.particle_count());
                    false
                }
                // Own shots pass through the body
                Faction::Player => true,
            };
        }

        if p.faction == Faction::Player {
            let hit = enemies
                .iter()
                .position(|e| circles_overlap(e.pos, e.size, p.pos, p.size));
            if let Some(idx) = hit {
                let enemy = enemies.remove(idx);
                let points = GameTuning::banded(&tuning.kill_scores, snake.particle_count());
                stats.add_score(points);
                log::info!("Enemy {} shot down: +{} score", enemy.id, points);
                return false;
            }
        }

        true
    });
}
