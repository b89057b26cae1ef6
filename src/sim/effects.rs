//! Post-movement actor effects
//!
//! Invulnerability decay, edge-triggered bomb placement, blast/hole damage
//! and power-up pickup. Runs once per living player per tick, after the
//! movement resolver.

use glam::IVec2;

use super::state::{Bomb, Cell, Grid, InputState, Player, PowerUpKind, SoundEvent};
use crate::consts::*;
use crate::pixel_to_grid;

/// Apply one tick of effects to a player. `input` is the same per-tick input
/// snapshot the movement resolver used.
pub fn apply(
    player: &mut Player,
    input: InputState,
    grid: &mut Grid,
    bombs: &mut Vec<Bomb>,
    events: &mut Vec<SoundEvent>,
    elapsed_ms: i32,
) {
    if !player.alive {
        return;
    }

    if player.invulnerability_ms > 0 {
        player.invulnerability_ms = (player.invulnerability_ms - elapsed_ms).max(0);
    }

    // Bomb placement is edge-triggered: the latch disarms on placement and
    // re-arms only once the input is released, so a held key places exactly
    // one bomb per press.
    if input.place_bomb && player.bomb_ready {
        let own_bombs = bombs.iter().filter(|b| b.owner == player.id).count() as u32;
        if own_bombs < player.max_bombs {
            bombs.push(Bomb {
                owner: player.id,
                pos: bomb_location(player.pos),
                fuse_ms: DEFAULT_FUSE_MS,
                range: player.bomb_range,
            });
            events.push(SoundEvent::BombPlaced);
            player.bomb_ready = false;
        }
    }
    if !input.place_bomb {
        player.bomb_ready = true;
    }

    // Blast and hole overlap are two independent damage triggers against the
    // same pre-damage vulnerability, so a corner over both in one tick costs
    // up to two lives.
    let vulnerable = player.invulnerability_ms == 0;
    if vulnerable && corner_touching(grid, player.pos, Cell::Blast).is_some() {
        damage(player, events);
    }
    if vulnerable && corner_touching(grid, player.pos, Cell::Hole).is_some() {
        damage(player, events);
    }

    // Power-ups: keep polling while a corner still overlaps, since a stat
    // change never moves the player but several corners (or several cells)
    // can overlap at once.
    for kind in PowerUpKind::ALL {
        while let Some(cell_pos) = corner_touching(grid, player.pos, Cell::PowerUp(kind)) {
            apply_power_up(player, kind);
            grid.set_cell(cell_pos, Cell::Blank);
            events.push(SoundEvent::PowerUp);
        }
    }
}

fn apply_power_up(player: &mut Player, kind: PowerUpKind) {
    match kind {
        PowerUpKind::BombUp => player.max_bombs += 1,
        PowerUpKind::BombDown => player.max_bombs = player.max_bombs.saturating_sub(1).max(1),
        PowerUpKind::RangeUp => {
            player.bomb_range = (player.bomb_range + RANGE_STEP).min(MAX_RANGE)
        }
        PowerUpKind::RangeDown => {
            player.bomb_range = player.bomb_range.saturating_sub(RANGE_STEP).max(MIN_RANGE)
        }
        // Speed moves through three tiers: low, default, high
        PowerUpKind::SpeedUp => {
            player.speed = if player.speed == LOW_SPEED {
                DEFAULT_SPEED
            } else {
                HIGH_SPEED
            };
        }
        PowerUpKind::SpeedDown => {
            player.speed = if player.speed == HIGH_SPEED {
                DEFAULT_SPEED
            } else {
                LOW_SPEED
            };
        }
    }
}

fn damage(player: &mut Player, events: &mut Vec<SoundEvent>) {
    player.invulnerability_ms = INVULNERABILITY_MS;
    player.lives = player.lives.saturating_sub(1);
    if player.lives == 0 {
        player.alive = false;
    }
    events.push(SoundEvent::PlayerDeath);
}

/// Tile-centred pixel position for a bomb placed by a player standing at
/// `player_pos`: the tile under the player's centre, with the bomb box
/// centred inside it.
fn bomb_location(player_pos: IVec2) -> IVec2 {
    let centre = player_pos + IVec2::new(PLAYER_WIDTH / 2, PLAYER_HEIGHT / 2);
    let tile = pixel_to_grid(centre) * TILE_SIZE;
    tile + IVec2::new((TILE_SIZE - BOMB_WIDTH) / 2, (TILE_SIZE - BOMB_HEIGHT) / 2)
}

/// Grid position of the first of the player's four bounding-box corners that
/// sits on a cell of the given kind, if any
fn corner_touching(grid: &Grid, pos: IVec2, cell: Cell) -> Option<IVec2> {
    let corners = [
        pos,
        pos + IVec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        pos + IVec2::new(0, PLAYER_HEIGHT),
        pos + IVec2::new(PLAYER_WIDTH, 0),
    ];
    corners
        .into_iter()
        .find(|&c| grid.cell_at_pixel(c) == cell)
        .map(pixel_to_grid)
}
