//! Player movement and collision resolution
//!
//! The tricky part of the simulation: continuous pixel movement against the
//! discrete tile grid. Collision is resolved per bounding-box corner with a
//! discrete push-back loop, plus a "corner assist" slide that stops players
//! from snagging on the outer corner of a tile, plus bomb-body collision
//! (players may stand on a bomb they already overlap, but not walk into one).

use glam::IVec2;

use super::state::{Bomb, Cell, Grid, InputState, Movement, Player};
use crate::rects_intersect;

/// Resolve one player's movement for this tick. `input` is the per-tick
/// snapshot of the player's input state.
pub fn resolve_movement(
    player: &mut Player,
    input: InputState,
    grid: &Grid,
    bombs: &[Bomb],
    elapsed_ms: i32,
) {
    if !player.alive || input.movement == Movement::None {
        return;
    }

    let displacement = (elapsed_ms as f32 * player.speed / 1000.0) as i32;
    let size = Player::size();
    let initial_pos = player.pos;
    // Unit step opposing the direction of travel, used by every push-back loop
    let from_direction = -input.movement.delta();

    player.pos += input.movement.delta() * displacement;

    // Solid-geometry clamp: push each overlapping corner (and the player with
    // it) back one pixel at a time. Out-of-bounds pixels read as passable, so
    // the loops terminate at the map edge without special-casing.
    for offset in [
        IVec2::ZERO,
        IVec2::new(size.x, 0),
        IVec2::new(0, size.y),
        size,
    ] {
        let mut corner = player.pos + offset;
        while grid.cell_at_pixel(corner).is_solid() {
            corner += from_direction;
            player.pos += from_direction;
        }
    }

    // Corner assist: when exactly one of the two leading corners is snagged
    // next to solid geometry, slide along the perpendicular axis toward the
    // open corner so travel continues around the tile corner.
    let clamped_pos = player.pos;
    let up_left = player.pos;
    let up_right = player.pos + IVec2::new(size.x, 0);
    let down_left = player.pos + IVec2::new(0, size.y);
    let down_right = player.pos + size;
    match input.movement {
        Movement::Up => {
            if neighbours_clear(grid, up_left) && !neighbours_clear(grid, up_right) {
                player.pos.x -= displacement;
            } else if !neighbours_clear(grid, up_left) && neighbours_clear(grid, up_right) {
                player.pos.x += displacement;
            }
        }
        Movement::Down => {
            if neighbours_clear(grid, down_left) && !neighbours_clear(grid, down_right) {
                player.pos.x -= displacement;
            } else if !neighbours_clear(grid, down_left) && neighbours_clear(grid, down_right) {
                player.pos.x += displacement;
            }
        }
        Movement::Left => {
            if neighbours_clear(grid, up_left) && !neighbours_clear(grid, down_left) {
                player.pos.y -= displacement;
            } else if !neighbours_clear(grid, up_left) && neighbours_clear(grid, down_left) {
                player.pos.y += displacement;
            }
        }
        Movement::Right => {
            if neighbours_clear(grid, up_right) && !neighbours_clear(grid, down_right) {
                player.pos.y -= displacement;
            } else if !neighbours_clear(grid, up_right) && neighbours_clear(grid, down_right) {
                player.pos.y += displacement;
            }
        }
        Movement::None => {}
    }
    let corner_assisted = player.pos != clamped_pos;

    // Bomb-body collision: bombs already overlapped before the move stay
    // walkable; any newly entered bomb pushes the player back out along the
    // movement axis. A slide that ends inside a bomb is undone first.
    let bomb_size = Bomb::size();
    for bomb in bombs {
        if rects_intersect(initial_pos, size, bomb.pos, bomb_size) {
            continue;
        }
        if corner_assisted && rects_intersect(player.pos, size, bomb.pos, bomb_size) {
            player.pos = clamped_pos;
        }
        while rects_intersect(player.pos, size, bomb.pos, bomb_size) {
            player.pos += from_direction;
        }
    }
}

/// A pixel and its four 1-pixel neighbours are all non-solid
fn neighbours_clear(grid: &Grid, p: IVec2) -> bool {
    point_clear(grid, p)
        && point_clear(grid, p + IVec2::new(1, 0))
        && point_clear(grid, p + IVec2::new(-1, 0))
        && point_clear(grid, p + IVec2::new(0, 1))
        && point_clear(grid, p + IVec2::new(0, -1))
}

fn point_clear(grid: &Grid, p: IVec2) -> bool {
    !grid.cell_at_pixel(p).is_solid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn blank_grid(w: i32, h: i32) -> Grid {
        Grid::filled(w, h, Cell::Blank).unwrap()
    }

    fn moving(movement: Movement) -> InputState {
        InputState {
            movement,
            place_bomb: false,
        }
    }

    fn player_at(x: i32, y: i32) -> Player {
        Player::new(0, "p", IVec2::new(x, y))
    }

    #[test]
    fn test_wall_blocks_full_tile_move() {
        // Indestructible at (1,0); a one-tile move right must stay in tile 0
        let mut grid = blank_grid(3, 3);
        grid.set_cell(IVec2::new(1, 0), Cell::Indestructible);
        let mut player = player_at(0, 0);
        player.speed = 64.0; // 64 px over 1000 ms

        resolve_movement(&mut player, moving(Movement::Right), &grid, &[], 1000);

        assert!(player.pos.x + PLAYER_WIDTH < TILE_SIZE);
        assert_eq!(player.pos.y, 0);
    }

    #[test]
    fn test_destructible_blocks_like_solid() {
        let mut grid = blank_grid(3, 3);
        grid.set_cell(IVec2::new(0, 1), Cell::Destructible);
        let mut player = player_at(10, 0);
        player.speed = 300.0;

        resolve_movement(&mut player, moving(Movement::Down), &grid, &[], 250);

        assert!(player.pos.y + PLAYER_HEIGHT < TILE_SIZE);
    }

    #[test]
    fn test_dead_player_does_not_move() {
        let grid = blank_grid(3, 3);
        let mut player = player_at(10, 10);
        player.alive = false;
        resolve_movement(&mut player, moving(Movement::Right), &grid, &[], 1000);
        assert_eq!(player.pos, IVec2::new(10, 10));
    }

    #[test]
    fn test_no_direction_no_move() {
        let grid = blank_grid(3, 3);
        let mut player = player_at(10, 10);
        resolve_movement(&mut player, moving(Movement::None), &grid, &[], 1000);
        assert_eq!(player.pos, IVec2::new(10, 10));
    }

    #[test]
    fn test_corner_assist_slides_toward_open_corner() {
        // Solid tile at (1,0): moving up with the right leading corner snagged
        // should slide the player left by the displacement.
        let mut grid = blank_grid(3, 3);
        grid.set_cell(IVec2::new(1, 0), Cell::Indestructible);
        let mut player = player_at(40, 70);
        player.speed = 8.0 * 1000.0; // 8 px over the 1 ms delta below

        resolve_movement(&mut player, moving(Movement::Up), &grid, &[], 1);

        // Clamp stops the box under the solid tile, then the slide kicks in
        assert_eq!(player.pos.y, TILE_SIZE);
        assert_eq!(player.pos.x, 40 - 8);
    }

    #[test]
    fn test_no_slide_when_both_corners_blocked() {
        let mut grid = blank_grid(3, 3);
        grid.set_cell(IVec2::new(0, 0), Cell::Indestructible);
        grid.set_cell(IVec2::new(1, 0), Cell::Indestructible);
        let mut player = player_at(40, 70);
        player.speed = 8.0 * 1000.0;

        resolve_movement(&mut player, moving(Movement::Up), &grid, &[], 1);

        assert_eq!(player.pos.y, TILE_SIZE);
        assert_eq!(player.pos.x, 40); // no lateral nudge
    }

    #[test]
    fn test_walking_into_bomb_pushes_back() {
        let grid = blank_grid(3, 3);
        // Bomb centred in tile (1,0)
        let bomb = Bomb {
            owner: 1,
            pos: IVec2::new(TILE_SIZE + (TILE_SIZE - BOMB_WIDTH) / 2, 7),
            fuse_ms: 2000,
            range: 3,
        };
        let mut player = player_at(0, 7);
        player.speed = 48.0 * 1000.0;

        resolve_movement(&mut player, moving(Movement::Right), &grid, &[bomb.clone()], 1);

        // Pushed back until the boxes no longer overlap
        assert!(player.pos.x + PLAYER_WIDTH <= bomb.pos.x);
        assert_eq!(player.pos.x + PLAYER_WIDTH, bomb.pos.x);
    }

    #[test]
    fn test_standing_on_bomb_stays_walkable() {
        let grid = blank_grid(3, 3);
        let bomb = Bomb {
            owner: 0,
            pos: IVec2::new(TILE_SIZE + 7, 7),
            fuse_ms: 2000,
            range: 3,
        };
        // Player already overlapping the bomb it just placed
        let mut player = player_at(60, 7);
        player.speed = 4.0 * 1000.0;

        resolve_movement(&mut player, moving(Movement::Right), &grid, &[bomb], 1);

        assert_eq!(player.pos.x, 64); // moved freely
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_movement() -> impl Strategy<Value = Movement> {
            prop_oneof![
                Just(Movement::Up),
                Just(Movement::Down),
                Just(Movement::Left),
                Just(Movement::Right),
            ]
        }

        proptest! {
            /// No tunneling: for sub-tile displacements, a resolved position
            /// never leaves a corner inside solid geometry.
            #[test]
            fn resolved_position_never_inside_solid(
                start_x in TILE_SIZE..5 * TILE_SIZE - PLAYER_WIDTH,
                start_y in TILE_SIZE..5 * TILE_SIZE - PLAYER_HEIGHT,
                movement in arb_movement(),
                elapsed_ms in 0i32..100,
            ) {
                // Walled arena with a pillar in the middle
                let mut grid = Grid::filled(7, 7, Cell::Blank).unwrap();
                for i in 0..7 {
                    grid.set_cell(IVec2::new(i, 0), Cell::Indestructible);
                    grid.set_cell(IVec2::new(i, 6), Cell::Indestructible);
                    grid.set_cell(IVec2::new(0, i), Cell::Indestructible);
                    grid.set_cell(IVec2::new(6, i), Cell::Indestructible);
                }
                grid.set_cell(IVec2::new(3, 3), Cell::Destructible);

                let mut player = Player::new(0, "p", IVec2::new(start_x, start_y));
                let input = InputState { movement, place_bomb: false };
                resolve_movement(&mut player, input, &grid, &[], elapsed_ms);

                let size = Player::size();
                for offset in [IVec2::ZERO, IVec2::new(size.x, 0), IVec2::new(0, size.y), size] {
                    prop_assert!(!grid.cell_at_pixel(player.pos + offset).is_solid());
                }
            }
        }
    }
}
