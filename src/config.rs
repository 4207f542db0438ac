//! Tuning constants and the level layout table.
//!
//! Every section is `#[serde(default)]`, so a TOML file only needs to name the
//! values it changes.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::entities::{PlayField, Rgb};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Simulated seconds per frame; also the real frame budget.
    pub step_time: f64,
    /// Subtracted from the countdown each frame.  Larger than `step_time` to
    /// absorb per-frame compute overhead.
    pub timer_decrement: f64,
    pub time_limit: f64,
    /// Timer label turns red at or below this many seconds.
    pub urgent_time: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            step_time: 0.02,
            timer_decrement: 0.06,
            time_limit: 45.0,
            urgent_time: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f64,
    pub height: f64,
    /// y of the ground line.
    pub play_height: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            play_height: 450.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub initial_gravity: f64,
    /// Added to gravity each time a level is cleared.
    pub gravity_step: f64,
    /// Children smaller than this are not spawned.
    pub split_threshold: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            initial_gravity: 2.0,
            gravity_step: 1.0,
            split_threshold: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    pub start_x: f64,
    /// Body centre.
    pub start_y: f64,
    pub speed: f64,
    pub body_width: f64,
    pub body_height: f64,
    pub head_radius: f64,
    pub health: u32,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            start_x: 250.0,
            start_y: 410.0,
            speed: 400.0,
            body_width: 18.0,
            body_height: 30.0,
            head_radius: 8.0,
            health: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            speed: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BubbleSpawn {
    pub x: f64,
    pub radius: f64,
    pub vx: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelLayout {
    #[serde(default = "default_spawn_y")]
    pub spawn_y: f64,
    pub bubbles: Vec<BubbleSpawn>,
}

fn default_spawn_y() -> f64 {
    50.0
}

const BUBBLE_DEFAULT_RADIUS: f64 = 10.0;
const BUBBLE_DEFAULT_VX: f64 = 150.0;

fn default_levels() -> Vec<LevelLayout> {
    let quarter = FieldConfig::default().width / 4.0;
    let spawn = |x: f64, scale: f64, vx: f64, color: Rgb| BubbleSpawn {
        x,
        radius: BUBBLE_DEFAULT_RADIUS * scale,
        vx: BUBBLE_DEFAULT_VX * vx,
        color,
    };

    let pink = Rgb::new(255, 105, 180);
    let salmon = Rgb::new(255, 139, 139);
    let ochre = Rgb::new(214, 163, 84);

    vec![
        LevelLayout {
            spawn_y: default_spawn_y(),
            bubbles: vec![
                spawn(2.0 * quarter, 1.0, -1.0, pink),
                spawn(quarter, 1.0, 1.0, pink),
            ],
        },
        LevelLayout {
            spawn_y: default_spawn_y(),
            bubbles: vec![
                spawn(quarter, 2.0, 1.6, salmon),
                spawn(2.0 * quarter, 2.0, -1.8, salmon),
                spawn(3.0 * quarter, 2.0, 2.1, salmon),
            ],
        },
        LevelLayout {
            spawn_y: default_spawn_y(),
            bubbles: vec![
                spawn(quarter, 4.0, 2.9, ochre),
                spawn(2.0 * quarter, 4.0, -2.5, ochre),
                spawn(3.0 * quarter, 4.0, 2.4, ochre),
            ],
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub field: FieldConfig,
    pub physics: PhysicsConfig,
    pub shooter: ShooterConfig,
    pub bullet: BulletConfig,
    pub levels: Vec<LevelLayout>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            field: FieldConfig::default(),
            physics: PhysicsConfig::default(),
            shooter: ShooterConfig::default(),
            bullet: BulletConfig::default(),
            levels: default_levels(),
        }
    }
}

impl GameConfig {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_toml(&raw)
            .with_context(|| format!("loading config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let cfg: GameConfig = toml::from_str(raw).context("parse TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn play_field(&self) -> PlayField {
        PlayField {
            width: self.field.width,
            height: self.field.height,
            play_height: self.field.play_height,
        }
    }

    /// Number of levels in the layout table, saturating at `u32::MAX`.
    pub fn level_count(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        // NaN and infinity slip past every ordered comparison below.
        for (name, v) in self.float_fields() {
            if !v.is_finite() {
                bail!("{name} must be a finite number (got {v})");
            }
        }

        let t = &self.timing;
        if t.step_time <= 0.0 {
            bail!("timing.step_time must be positive (got {})", t.step_time);
        }
        if t.timer_decrement <= 0.0 {
            bail!("timing.timer_decrement must be positive (got {})", t.timer_decrement);
        }
        if t.time_limit <= 0.0 {
            bail!("timing.time_limit must be positive (got {})", t.time_limit);
        }

        let f = &self.field;
        if f.width <= 0.0 || f.height <= 0.0 {
            bail!("field dimensions must be positive ({} x {})", f.width, f.height);
        }
        if f.play_height <= 0.0 || f.play_height > f.height {
            bail!("field.play_height {} outside (0, {}]", f.play_height, f.height);
        }

        if self.physics.split_threshold <= 0.0 {
            bail!("physics.split_threshold must be positive");
        }

        let s = &self.shooter;
        if s.health == 0 {
            bail!("shooter.health must be at least 1");
        }
        if s.body_width <= 0.0 || s.body_height <= 0.0 || s.head_radius <= 0.0 {
            bail!("shooter dimensions must be positive");
        }
        if s.start_x < s.body_width / 2.0 || s.start_x > f.width - s.body_width / 2.0 {
            bail!("shooter.start_x {} puts the shooter outside the field", s.start_x);
        }

        let b = &self.bullet;
        if b.speed <= 0.0 || b.width <= 0.0 || b.height <= 0.0 {
            bail!("bullet speed and dimensions must be positive");
        }

        if self.levels.is_empty() {
            bail!("at least one [[levels]] entry is required");
        }
        u32::try_from(self.levels.len())
            .with_context(|| format!("too many levels ({})", self.levels.len()))?;
        for (i, level) in self.levels.iter().enumerate() {
            let n = i + 1;
            if level.bubbles.is_empty() {
                bail!("level {n} has no bubbles");
            }
            if level.spawn_y < 0.0 || level.spawn_y >= f.play_height {
                bail!("level {n}: spawn_y {} is outside the play field", level.spawn_y);
            }
            for b in &level.bubbles {
                if b.radius <= 0.0 {
                    bail!("level {n}: bubble radius must be positive (got {})", b.radius);
                }
                if b.x < 0.0 || b.x > f.width {
                    bail!("level {n}: bubble x {} is outside the field", b.x);
                }
            }
        }
        Ok(())
    }

    /// Every floating-point setting, named the way it appears in TOML.
    fn float_fields(&self) -> Vec<(String, f64)> {
        let (t, f, p) = (&self.timing, &self.field, &self.physics);
        let (s, b) = (&self.shooter, &self.bullet);
        let mut fields: Vec<(String, f64)> = [
            ("timing.step_time", t.step_time),
            ("timing.timer_decrement", t.timer_decrement),
            ("timing.time_limit", t.time_limit),
            ("timing.urgent_time", t.urgent_time),
            ("field.width", f.width),
            ("field.height", f.height),
            ("field.play_height", f.play_height),
            ("physics.initial_gravity", p.initial_gravity),
            ("physics.gravity_step", p.gravity_step),
            ("physics.split_threshold", p.split_threshold),
            ("shooter.start_x", s.start_x),
            ("shooter.start_y", s.start_y),
            ("shooter.speed", s.speed),
            ("shooter.body_width", s.body_width),
            ("shooter.body_height", s.body_height),
            ("shooter.head_radius", s.head_radius),
            ("bullet.width", b.width),
            ("bullet.height", b.height),
            ("bullet.speed", b.speed),
        ]
        .into_iter()
        .map(|(name, v)| (name.to_string(), v))
        .collect();

        for (i, level) in self.levels.iter().enumerate() {
            let n = i + 1;
            fields.push((format!("levels[{n}].spawn_y"), level.spawn_y));
            for bubble in &level.bubbles {
                fields.push((format!("levels[{n}] bubble x"), bubble.x));
                fields.push((format!("levels[{n}] bubble radius"), bubble.radius));
                fields.push((format!("levels[{n}] bubble vx"), bubble.vx));
            }
        }
        fields
    }

    /// Check a requested starting level against the layout table.
    pub fn check_start_level(&self, level: u32) -> Result<()> {
        if level == 0 || level > self.level_count() {
            bail!("level {level} out of range 1..={}", self.level_count());
        }
        Ok(())
    }
}
