//! Per-tick orchestration
//!
//! The only entry point external collaborators call. Sequencing is fixed and
//! load-bearing: map reveals first, then bomb fuses and detonations, then
//! per-player movement and effects, then the global phase counters that gate
//! procedural holes.

use super::{blast, collision, effects, hazard};
use super::state::World;
use crate::consts::*;

/// Advance the world by `elapsed_ms` milliseconds of simulated time.
/// Infallible and deterministic: the same state and delta always produce the
/// same next state.
pub fn tick(world: &mut World, elapsed_ms: i32) {
    update_reveals(world, elapsed_ms);
    update_bombs(world, elapsed_ms);

    let World {
        grid,
        players,
        bombs,
        sound_events,
        ..
    } = world;
    for player in players.iter_mut() {
        // One input snapshot per player per tick: the resolver and the
        // effect pass must never observe a torn direction/flag pair.
        let input = player.input;
        collision::resolve_movement(player, input, &*grid, &*bombs, elapsed_ms);
        effects::apply(player, input, &mut *grid, &mut *bombs, sound_events, elapsed_ms);
    }

    advance_counters(world, elapsed_ms);
}

/// Advance by the nominal turn-based delta (used by test harnesses and
/// turn-stepped callers).
pub fn step(world: &mut World) {
    tick(world, NOMINAL_STEP_MS);
}

/// Age pending reveals; expired ones restore their cell and are dropped.
fn update_reveals(world: &mut World, elapsed_ms: i32) {
    let World { grid, reveals, .. } = world;
    for timer in reveals.iter_mut() {
        timer.remaining_ms -= elapsed_ms;
        if timer.remaining_ms <= 0 {
            grid.set_cell(timer.pos, timer.reveal);
        }
    }
    reveals.retain(|t| t.remaining_ms > 0);
}

/// Age bomb fuses; expired bombs leave the active set and detonate.
fn update_bombs(world: &mut World, elapsed_ms: i32) {
    for bomb in world.bombs.iter_mut() {
        bomb.fuse_ms -= elapsed_ms;
    }
    let exploded: Vec<_> = world
        .bombs
        .iter()
        .filter(|b| b.fuse_ms <= 0)
        .cloned()
        .collect();
    world.bombs.retain(|b| b.fuse_ms > 0);

    let World {
        grid,
        reveals,
        sound_events,
        ..
    } = world;
    for bomb in &exploded {
        blast::detonate(bomb, grid, reveals, sound_events);
    }
}

/// Advance the global clock and, inside a hazard phase, the hazard-roll
/// counter. The late phase is checked first, mirroring the phase gating of
/// the hole spawner itself.
fn advance_counters(world: &mut World, elapsed_ms: i32) {
    world.elapsed_ms += elapsed_ms as i64;
    if world.elapsed_ms >= HAZARD_LATE_START_MS {
        world.hazard_ms += elapsed_ms;
        if world.hazard_ms >= HAZARD_LATE_INTERVAL_MS {
            world.hazard_ms = 0;
            hazard::spawn_hole(world, true);
        }
    } else if world.elapsed_ms >= HAZARD_EARLY_START_MS {
        world.hazard_ms += elapsed_ms;
        if world.hazard_ms >= HAZARD_EARLY_INTERVAL_MS {
            world.hazard_ms = 0;
            hazard::spawn_hole(world, false);
        }
    }
}
