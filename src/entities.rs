/// All game entity types — pure data, no game rules.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in playfield cells.  `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Size of the drawable area below the HUD row, in cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// ── Sprites ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Knight,
    Enemy,
    Coin,
    Heart,
}

impl SpriteKind {
    /// Footprint in cells as `(width, height)`.
    pub fn size(self) -> (f32, f32) {
        match self {
            SpriteKind::Knight => (3.0, 2.0),
            SpriteKind::Enemy => (4.0, 2.0),
            SpriteKind::Coin => (2.0, 1.0),
            SpriteKind::Heart => (1.0, 1.0),
        }
    }
}

// ── Per-frame input & output ──────────────────────────────────────────────────

/// Directional keys held during this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Everything the host hands the controller for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Monotonic clock reading in nanoseconds.
    pub now: u64,
    pub input: InputState,
    pub playfield: Playfield,
}

/// Fire-and-forget sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Hit,
    CoinPickup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Yellow,
    Red,
}

/// Whether a draw lands in playfield space or on the HUD row above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Playfield,
    Hud,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Sprite {
        kind: SpriteKind,
        x: f32,
        y: f32,
        layer: Layer,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        tint: Tint,
        layer: Layer,
    },
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The whole session.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Rect,
    pub enemies: Vec<Rect>,
    pub coins: Vec<Rect>,
    pub health: u32,
    pub score: u32,
    /// Monotonic nanoseconds of the most recent enemy spawn.
    pub last_enemy_spawn: u64,
    /// Monotonic nanoseconds of the most recent coin spawn.
    pub last_coin_spawn: u64,
    pub status: GameStatus,
    pub playfield: Playfield,
}
