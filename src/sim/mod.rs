//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit time deltas only (no wall-clock reads)
//! - Seeded RNG only, stored in the world
//! - Stable iteration order (the stored `Vec` orders)
//! - No rendering, audio playback or platform dependencies

pub mod blast;
pub mod collision;
pub mod effects;
pub mod hazard;
pub mod state;
pub mod tick;

pub use state::{
    Bomb, Cell, Grid, GridError, InputState, Movement, Player, PowerUpKind, RevealTimer,
    SoundEvent, World,
};
pub use tick::{step, tick};
