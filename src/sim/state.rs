//! World state and core simulation types
//!
//! The single authoritative container every tick mutates: the tile grid,
//! players, live bombs, pending cell reveals and the sound-event channel.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::pixel_to_grid;

/// One tile of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Blank,
    /// Destroyed by blasts; stops a blast line
    Destructible,
    /// Never changes; stops blasts without being marked
    Indestructible,
    /// Transient explosion marker, reverted by a [`RevealTimer`]
    Blast,
    /// Damages players; blasts pass over it
    Hole,
    PowerUp(PowerUpKind),
}

impl Cell {
    /// Solid cells block movement
    pub fn is_solid(self) -> bool {
        matches!(self, Cell::Indestructible | Cell::Destructible)
    }
}

/// Stat changes granted by power-up tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    BombUp,
    BombDown,
    RangeUp,
    RangeDown,
    SpeedUp,
    SpeedDown,
}

impl PowerUpKind {
    /// All kinds, in the order pickups are polled each tick
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::BombDown,
        PowerUpKind::BombUp,
        PowerUpKind::RangeDown,
        PowerUpKind::RangeUp,
        PowerUpKind::SpeedDown,
        PowerUpKind::SpeedUp,
    ];
}

/// Grid construction failures (fatal preconditions; ticking never fails)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// The tile map, addressable in grid coordinates (tile indices) or pixel
/// coordinates (tile index × [`TILE_SIZE`])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from rows of cells. Rejects an empty grid and ragged rows.
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(width * height);
        for (row, r) in rows.into_iter().enumerate() {
            if r.len() != width {
                return Err(GridError::Ragged {
                    row,
                    len: r.len(),
                    expected: width,
                });
            }
            cells.extend(r);
        }
        Ok(Self {
            width: width as i32,
            height: height as i32,
            cells,
        })
    }

    /// Uniform grid of one cell kind (handy for tests and harnesses)
    pub fn filled(width: i32, height: i32, cell: Cell) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::Empty);
        }
        Ok(Self {
            width,
            height,
            cells: vec![cell; (width * height) as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, grid_pos: IVec2) -> bool {
        grid_pos.x >= 0 && grid_pos.x < self.width && grid_pos.y >= 0 && grid_pos.y < self.height
    }

    /// Cell at a grid coordinate. Out-of-bounds queries are passable
    /// ([`Cell::Blank`]) so collision and blast logic need no edge cases.
    pub fn cell_at(&self, grid_pos: IVec2) -> Cell {
        if !self.in_bounds(grid_pos) {
            return Cell::Blank;
        }
        self.cells[(grid_pos.y * self.width + grid_pos.x) as usize]
    }

    /// Cell under a pixel coordinate
    pub fn cell_at_pixel(&self, pixel: IVec2) -> Cell {
        self.cell_at(pixel_to_grid(pixel))
    }

    /// Overwrite a cell. Out-of-bounds writes are ignored.
    pub fn set_cell(&mut self, grid_pos: IVec2, cell: Cell) {
        if self.in_bounds(grid_pos) {
            self.cells[(grid_pos.y * self.width + grid_pos.x) as usize] = cell;
        }
    }
}

/// Requested movement direction for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Movement {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Movement {
    /// Unit pixel step in the direction of travel
    pub fn delta(self) -> IVec2 {
        match self {
            Movement::None => IVec2::ZERO,
            Movement::Up => IVec2::new(0, -1),
            Movement::Down => IVec2::new(0, 1),
            Movement::Left => IVec2::new(-1, 0),
            Movement::Right => IVec2::new(1, 0),
        }
    }
}

/// Per-player input snapshot, written by input/AI collaborators and read
/// exactly once per player per tick (a single value copy, so a torn
/// direction/flag pair can never be observed mid-tick)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub movement: Movement,
    pub place_bomb: bool,
}

/// A player (human or autonomous; the simulation does not care which)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    /// Top-left corner of the bounding box, continuous pixel coordinates
    pub pos: IVec2,
    pub lives: u32,
    pub alive: bool,
    /// Pixels per second
    pub speed: f32,
    pub max_bombs: u32,
    /// Blast radius of bombs this player places (tiles)
    pub bomb_range: u32,
    /// Remaining damage-immunity window (ms)
    pub invulnerability_ms: i32,
    pub input: InputState,
    /// Edge-trigger latch for bomb placement; re-arms on input release
    pub bomb_ready: bool,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, pos: IVec2) -> Self {
        Self {
            id,
            name: name.into(),
            pos,
            lives: DEFAULT_LIVES,
            alive: true,
            speed: DEFAULT_SPEED,
            max_bombs: 1,
            bomb_range: 3,
            invulnerability_ms: 0,
            input: InputState::default(),
            bomb_ready: true,
        }
    }

    /// Bounding box extent
    pub fn size() -> IVec2 {
        IVec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

/// A live bomb, tile-centred
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub owner: u32,
    /// Top-left corner of the bounding box, pixel coordinates
    pub pos: IVec2,
    pub fuse_ms: i32,
    /// Blast radius (tiles)
    pub range: u32,
}

impl Bomb {
    pub fn size() -> IVec2 {
        IVec2::new(BOMB_WIDTH, BOMB_HEIGHT)
    }
}

/// A scheduled cell restoration: once `remaining_ms` elapses the cell at
/// `pos` reverts to `reveal`. At most one exists per grid position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealTimer {
    /// Grid coordinate
    pub pos: IVec2,
    pub remaining_ms: i32,
    pub reveal: Cell,
}

/// Semantic events for a presentation layer to drain between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEvent {
    BombPlaced,
    Explosion,
    PlayerDeath,
    PowerUp,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub grid: Grid,
    pub players: Vec<Player>,
    pub bombs: Vec<Bomb>,
    pub reveals: Vec<RevealTimer>,
    /// Append-only within a tick; never cleared by the core itself
    pub sound_events: Vec<SoundEvent>,
    /// Total simulated time (ms)
    pub elapsed_ms: i64,
    /// Time since the last hazard roll (ms)
    pub hazard_ms: i32,
    /// Seed this world was constructed with
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl World {
    /// Create a world over an already-parsed grid. Counters and the RNG are
    /// reset only here, never during ticking.
    pub fn new(grid: Grid, players: Vec<Player>, seed: u64) -> Self {
        Self {
            grid,
            players,
            bombs: Vec::new(),
            reveals: Vec::new(),
            sound_events: Vec::new(),
            elapsed_ms: 0,
            hazard_ms: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Hand the accumulated sound events to the presentation layer
    pub fn drain_sound_events(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sound_events)
    }

    /// Number of un-detonated bombs a player currently has on the map
    pub fn active_bomb_count(&self, player_id: u32) -> usize {
        self.bombs.iter().filter(|b| b.owner == player_id).count()
    }
}
