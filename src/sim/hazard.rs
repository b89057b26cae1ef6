//! Procedural hole spawning
//!
//! Two time-gated phases: the early phase avoids cells under players, the
//! late (aggressive) phase does not. Draws from the world's seeded RNG so
//! replays stay deterministic.

use glam::IVec2;
use rand::Rng;

use super::state::{Cell, Player, World};
use crate::consts::TILE_SIZE;
use crate::{grid_to_pixel, rects_intersect};

/// Convert one uniformly chosen eligible cell to a hole. No eligible cell is
/// a silent no-op.
pub fn spawn_hole(world: &mut World, aggressive: bool) {
    let mut eligible = Vec::new();
    for y in 0..world.grid.height() {
        for x in 0..world.grid.width() {
            let pos = IVec2::new(x, y);
            if ok_for_hole(world, pos, aggressive) {
                eligible.push(pos);
            }
        }
    }
    if eligible.is_empty() {
        return;
    }
    let pos = eligible[world.rng.random_range(0..eligible.len())];
    world.grid.set_cell(pos, Cell::Hole);
    log::debug!("hole opened at ({}, {})", pos.x, pos.y);
}

fn ok_for_hole(world: &World, pos: IVec2, aggressive: bool) -> bool {
    match world.grid.cell_at(pos) {
        Cell::Hole | Cell::Destructible | Cell::Indestructible | Cell::Blast => return false,
        _ => {}
    }
    if aggressive {
        return true;
    }
    // Early phase: never open the floor under someone's feet
    let tile_px = grid_to_pixel(pos);
    let tile_size = IVec2::splat(TILE_SIZE);
    !world
        .players
        .iter()
        .any(|p| rects_intersect(p.pos, Player::size(), tile_px, tile_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Grid;

    fn world_with(grid: Grid, players: Vec<Player>) -> World {
        World::new(grid, players, 42)
    }

    #[test]
    fn test_single_eligible_cell_always_chosen() {
        // Everything indestructible except one blank cell
        let mut grid = Grid::filled(4, 4, Cell::Indestructible).unwrap();
        grid.set_cell(IVec2::new(2, 1), Cell::Blank);
        let mut world = world_with(grid, Vec::new());

        spawn_hole(&mut world, true);

        assert_eq!(world.grid.cell_at(IVec2::new(2, 1)), Cell::Hole);
    }

    #[test]
    fn test_no_eligible_cell_is_a_noop() {
        let grid = Grid::filled(3, 3, Cell::Indestructible).unwrap();
        let mut world = world_with(grid, Vec::new());

        spawn_hole(&mut world, true);
        spawn_hole(&mut world, false);

        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(world.grid.cell_at(IVec2::new(x, y)), Cell::Indestructible);
            }
        }
    }

    #[test]
    fn test_early_phase_avoids_players() {
        // Two blank cells; a player stands on one of them
        let mut grid = Grid::filled(3, 3, Cell::Indestructible).unwrap();
        grid.set_cell(IVec2::new(0, 0), Cell::Blank);
        grid.set_cell(IVec2::new(2, 2), Cell::Blank);
        let player = Player::new(0, "p", IVec2::new(10, 10)); // on tile (0,0)
        let mut world = world_with(grid, vec![player]);

        spawn_hole(&mut world, false);

        assert_eq!(world.grid.cell_at(IVec2::new(0, 0)), Cell::Blank);
        assert_eq!(world.grid.cell_at(IVec2::new(2, 2)), Cell::Hole);
    }

    #[test]
    fn test_aggressive_phase_may_target_players() {
        let mut grid = Grid::filled(3, 3, Cell::Indestructible).unwrap();
        grid.set_cell(IVec2::new(0, 0), Cell::Blank);
        let player = Player::new(0, "p", IVec2::new(10, 10));
        let mut world = world_with(grid, vec![player]);

        spawn_hole(&mut world, true);

        assert_eq!(world.grid.cell_at(IVec2::new(0, 0)), Cell::Hole);
    }

    #[test]
    fn test_power_up_cells_are_eligible() {
        use crate::sim::state::PowerUpKind;
        let mut grid = Grid::filled(3, 3, Cell::Indestructible).unwrap();
        grid.set_cell(IVec2::new(1, 1), Cell::PowerUp(PowerUpKind::SpeedUp));
        let mut world = world_with(grid, Vec::new());

        spawn_hole(&mut world, true);

        assert_eq!(world.grid.cell_at(IVec2::new(1, 1)), Cell::Hole);
    }
}
