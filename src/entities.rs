/// All game entity types — pure data plus a few geometry accessors, no game logic.

use serde::Deserialize;

// ── Colour ────────────────────────────────────────────────────────────────────

/// 24-bit colour.  Only the renderer looks at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb { r, g, b }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// What a single key event means to the game.  Produced by `input::action_for_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Fire,
    Quit,
    Unknown,
}

/// One key press as seen by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub action: InputAction,
    /// Printable form of the key for the `Cmd:` label.
    pub glyph: Option<char>,
}

// ── Play field ────────────────────────────────────────────────────────────────

/// Window extents in world units.  Bubbles bounce off the side walls and the
/// ground line at `play_height`; bullets die once they pass y = 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayField {
    pub width: f64,
    pub height: f64,
    pub play_height: f64,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Upward speed in units per second (always positive).
    pub speed: f64,
}

impl Bullet {
    /// Vertical extent as `(top, bottom)`.
    pub fn y_range(&self) -> (f64, f64) {
        (self.y - self.height / 2.0, self.y + self.height / 2.0)
    }
}

// ── Bubbles ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: Rgb,
}

// ── Shooter ───────────────────────────────────────────────────────────────────

/// A circular head sitting on top of a rectangular body.
///
/// `x`/`y` is the centre of the body; the head is stacked directly above it.
#[derive(Clone, Debug, PartialEq)]
pub struct Shooter {
    pub x: f64,
    pub y: f64,
    pub body_width: f64,
    pub body_height: f64,
    pub head_radius: f64,
    /// Horizontal speed in units per second.
    pub speed: f64,
    /// Set while a bubble overlaps the shooter (drawn cyan instead of green).
    pub hit: bool,
}

pub const SHOOTER_SAFE: Rgb = Rgb::new(0, 255, 0);
pub const SHOOTER_HIT: Rgb = Rgb::new(0, 255, 255);

impl Shooter {
    pub fn head_center(&self) -> (f64, f64) {
        (self.x, self.y - self.body_height / 2.0 - self.head_radius)
    }

    /// Vertical extent of the body as `(top, bottom)`.
    pub fn body_y_range(&self) -> (f64, f64) {
        (self.y - self.body_height / 2.0, self.y + self.body_height / 2.0)
    }

    pub fn color(&self) -> Rgb {
        if self.hit {
            SHOOTER_HIT
        } else {
            SHOOTER_SAFE
        }
    }
}

// ── Round & game state ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// "Level N!" flash, waiting for any key.
    LevelIntro,
    Playing,
    /// Last level cleared.
    Victory,
    Defeat,
}

/// The on-screen countdown.  Only refreshed when the fractional timer crosses
/// a whole second, so it lags `RoundState::time_left` slightly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerLabel {
    pub seconds: u32,
    pub urgent: bool,
}

/// Everything that lives for exactly one level.
#[derive(Clone, Debug)]
pub struct RoundState {
    pub shooter: Shooter,
    pub bubbles: Vec<Bubble>,
    pub bullets: Vec<Bullet>,
    pub health: u32,
    pub max_health: u32,
    pub score: u32,
    pub time_left: f64,
    pub timer_label: TimerLabel,
    /// Health was already taken for the overlap currently in progress.
    pub collision_counted: bool,
    /// Character of the last key pressed, for the `Cmd:` label.
    pub last_command: Option<char>,
    pub status: RoundStatus,
}

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    /// 1-based.
    pub level: u32,
    pub level_count: u32,
    /// Added to every bubble's vertical velocity each step.
    pub gravity: f64,
    pub phase: Phase,
    pub round: RoundState,
}
