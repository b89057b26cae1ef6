//! Explosion propagation
//!
//! Depth-first directional expansion from a detonating bomb. Destructible
//! cells are consumed and stop their blast line; indestructible cells stop
//! the line untouched; holes let the blast wash over them and revert to
//! holes. Every blasted cell gets a reveal timer restoring it afterwards.

use glam::IVec2;

use super::state::{Bomb, Cell, Grid, RevealTimer, SoundEvent};
use crate::consts::BLAST_REVEAL_MS;
use crate::pixel_to_grid;

/// Propagation direction of one blast line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ignition cell only: fan out into all four lines
    All,
    Up,
    Right,
    Down,
    Left,
}

/// Detonate a bomb: propagate the blast from its tile in all four directions
/// and emit the explosion event.
pub fn detonate(
    bomb: &Bomb,
    grid: &mut Grid,
    reveals: &mut Vec<RevealTimer>,
    events: &mut Vec<SoundEvent>,
) {
    let origin = pixel_to_grid(bomb.pos);
    log::debug!(
        "bomb by player {} detonated at ({}, {}) range {}",
        bomb.owner,
        origin.x,
        origin.y,
        bomb.range
    );
    spread(grid, reveals, origin, bomb.range, Direction::All);
    events.push(SoundEvent::Explosion);
}

/// Recursively expand one blast line. Radius counts down by one per cell and
/// the recursion depth is bounded by it.
pub fn spread(
    grid: &mut Grid,
    reveals: &mut Vec<RevealTimer>,
    pos: IVec2,
    radius: u32,
    direction: Direction,
) {
    if !grid.in_bounds(pos) {
        return;
    }
    if radius == 0 || grid.cell_at(pos) == Cell::Indestructible {
        return;
    }

    match grid.cell_at(pos) {
        // A destructible block soaks up the line: it burns down to blank
        // but nothing continues past it.
        Cell::Destructible => {
            schedule_reveal(reveals, pos, Cell::Blank);
        }
        cell => {
            // Holes survive the blast; everything else reverts to blank
            if cell == Cell::Hole {
                schedule_reveal(reveals, pos, Cell::Hole);
            } else {
                schedule_reveal(reveals, pos, Cell::Blank);
            }
            match direction {
                Direction::All => {
                    spread(grid, reveals, pos + IVec2::new(0, -1), radius - 1, Direction::Up);
                    spread(grid, reveals, pos + IVec2::new(1, 0), radius - 1, Direction::Right);
                    spread(grid, reveals, pos + IVec2::new(0, 1), radius - 1, Direction::Down);
                    spread(grid, reveals, pos + IVec2::new(-1, 0), radius - 1, Direction::Left);
                }
                Direction::Up => {
                    spread(grid, reveals, pos + IVec2::new(0, -1), radius - 1, Direction::Up)
                }
                Direction::Right => {
                    spread(grid, reveals, pos + IVec2::new(1, 0), radius - 1, Direction::Right)
                }
                Direction::Down => {
                    spread(grid, reveals, pos + IVec2::new(0, 1), radius - 1, Direction::Down)
                }
                Direction::Left => {
                    spread(grid, reveals, pos + IVec2::new(-1, 0), radius - 1, Direction::Left)
                }
            }
        }
    }

    grid.set_cell(pos, Cell::Blast);
}

/// Schedule a cell restoration, keeping at most one timer per position: a
/// repeat blast refreshes the countdown and keeps the original reveal kind.
fn schedule_reveal(reveals: &mut Vec<RevealTimer>, pos: IVec2, reveal: Cell) {
    if let Some(timer) = reveals.iter_mut().find(|t| t.pos == pos) {
        timer.remaining_ms = BLAST_REVEAL_MS;
    } else {
        reveals.push(RevealTimer {
            pos,
            remaining_ms: BLAST_REVEAL_MS,
            reveal,
        });
    }
}
