//! Gridbomb - deterministic simulation core for a bomb-placing arena game
//!
//! Everything gameplay-authoritative lives under `sim`: tile grid, player
//! movement and collision, bomb fuses and blast propagation, timed cell
//! reveals, power-ups and procedural holes. The crate owns no scheduling,
//! rendering, input capture or networking - callers drive [`sim::tick`] at
//! whatever cadence they choose and read the world back out between ticks.

pub mod sim;

pub use sim::{
    Bomb, Cell, Grid, GridError, InputState, Movement, Player, PowerUpKind, RevealTimer,
    SoundEvent, World,
};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid tile in pixels
    pub const TILE_SIZE: i32 = 64;

    /// Player bounding box extent (pixels)
    pub const PLAYER_WIDTH: i32 = 32;
    pub const PLAYER_HEIGHT: i32 = 32;

    /// Bomb bounding box extent (pixels), centred within its tile
    pub const BOMB_WIDTH: i32 = 50;
    pub const BOMB_HEIGHT: i32 = 50;

    /// Fuse duration of a freshly placed bomb (ms)
    pub const DEFAULT_FUSE_MS: i32 = 2000;
    /// How long a blast cell stays on the map before its reveal fires (ms)
    pub const BLAST_REVEAL_MS: i32 = 500;
    /// Post-damage invulnerability window (ms)
    pub const INVULNERABILITY_MS: i32 = 1000;

    /// Movement speed tiers (pixels per second)
    pub const LOW_SPEED: f32 = 200.0;
    pub const DEFAULT_SPEED: f32 = 300.0;
    pub const HIGH_SPEED: f32 = 450.0;

    /// Blast radius bounds and power-up step (tiles)
    pub const MIN_RANGE: u32 = 1;
    pub const MAX_RANGE: u32 = 10;
    pub const RANGE_STEP: u32 = 1;

    /// Hazard phases: holes start appearing after the early threshold,
    /// and may spawn under players after the late threshold
    pub const HAZARD_EARLY_START_MS: i64 = 60_000;
    pub const HAZARD_LATE_START_MS: i64 = 120_000;
    pub const HAZARD_EARLY_INTERVAL_MS: i32 = 10_000;
    pub const HAZARD_LATE_INTERVAL_MS: i32 = 5_000;

    /// Delta used by the zero-argument stepping overload (ms)
    pub const NOMINAL_STEP_MS: i32 = 1000;

    /// Starting lives
    pub const DEFAULT_LIVES: u32 = 3;
}

/// Convert a pixel coordinate to the grid coordinate of its containing tile
#[inline]
pub fn pixel_to_grid(pixel: IVec2) -> IVec2 {
    IVec2::new(
        pixel.x.div_euclid(consts::TILE_SIZE),
        pixel.y.div_euclid(consts::TILE_SIZE),
    )
}

/// Convert a grid coordinate to the pixel coordinate of the tile's top-left corner
#[inline]
pub fn grid_to_pixel(grid: IVec2) -> IVec2 {
    grid * consts::TILE_SIZE
}

/// Strict AABB intersection: true only for a positive-area overlap
#[inline]
pub fn rects_intersect(a_pos: IVec2, a_size: IVec2, b_pos: IVec2, b_size: IVec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && b_pos.x < a_pos.x + a_size.x
        && a_pos.y < b_pos.y + b_size.y
        && b_pos.y < a_pos.y + a_size.y
}
