/// Pure game-logic functions.
///
/// Every public function takes immutable references to the current state and
/// returns a brand-new value.  The only side effect is logging.

use crate::config::{BulletConfig, GameConfig, LevelLayout, TimingConfig};
use crate::entities::{
    Bubble, Bullet, GameState, InputAction, KeyInput, Phase, PlayField, RoundState, RoundStatus,
    Shooter, TimerLabel,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Bubbles for one level, all starting at rest vertically.
pub fn create_bubbles(layout: &LevelLayout) -> Vec<Bubble> {
    layout
        .bubbles
        .iter()
        .map(|spawn| Bubble {
            x: spawn.x,
            y: layout.spawn_y,
            radius: spawn.radius,
            vx: spawn.vx,
            vy: 0.0,
            color: spawn.color,
        })
        .collect()
}

pub fn spawn_shooter(cfg: &GameConfig) -> Shooter {
    let s = &cfg.shooter;
    Shooter {
        x: s.start_x,
        y: s.start_y,
        body_width: s.body_width,
        body_height: s.body_height,
        head_radius: s.head_radius,
        speed: s.speed,
        hit: false,
    }
}

fn timer_label_for(time_left: f64, timing: &TimingConfig) -> TimerLabel {
    TimerLabel {
        seconds: time_left.max(0.0) as u32,
        urgent: time_left <= timing.urgent_time,
    }
}

/// Fresh round for `level` (1-based).  Health, score and timer all start over.
pub fn start_round(level: u32, cfg: &GameConfig) -> RoundState {
    let index = (level.max(1) as usize - 1).min(cfg.levels.len().saturating_sub(1));
    let bubbles = cfg.levels.get(index).map(create_bubbles).unwrap_or_default();
    let time_left = cfg.timing.time_limit;

    RoundState {
        shooter: spawn_shooter(cfg),
        bubbles,
        bullets: Vec::new(),
        health: cfg.shooter.health,
        max_health: cfg.shooter.health,
        score: 0,
        time_left,
        timer_label: TimerLabel {
            seconds: time_left.max(0.0) as u32,
            urgent: false,
        },
        collision_counted: false,
        last_command: None,
        status: RoundStatus::Playing,
    }
}

pub fn new_game(cfg: &GameConfig) -> GameState {
    new_game_at(1, cfg)
}

/// Start at an arbitrary level, with gravity as if every earlier level had
/// been cleared.
pub fn new_game_at(level: u32, cfg: &GameConfig) -> GameState {
    let level = level.clamp(1, cfg.level_count().max(1));
    GameState {
        level,
        level_count: cfg.level_count(),
        gravity: cfg.physics.initial_gravity + cfg.physics.gravity_step * f64::from(level - 1),
        phase: Phase::LevelIntro,
        round: start_round(level, cfg),
    }
}

/// LevelIntro → Playing.  Any other phase is returned unchanged.
pub fn begin_level(state: &GameState, cfg: &GameConfig) -> GameState {
    if state.phase != Phase::LevelIntro {
        return state.clone();
    }
    log::info!(
        "Level {}/{} started (gravity {})",
        state.level,
        state.level_count,
        state.gravity
    );
    GameState {
        phase: Phase::Playing,
        round: start_round(state.level, cfg),
        ..state.clone()
    }
}

// ── Motion ───────────────────────────────────────────────────────────────────

/// One Euler step.  A wall or floor bounce reflects the velocity component and
/// redoes that axis' displacement with the reflected value.  There is no
/// ceiling: a bubble never climbs above its spawn height.
pub fn bubble_next_step(bubble: &Bubble, dt: f64, gravity: f64, field: &PlayField) -> Bubble {
    let mut vx = bubble.vx;
    let mut vy = bubble.vy;

    let mut new_x = bubble.x + vx * dt;
    let mut new_y = bubble.y + vy * dt;

    vy += gravity;

    let past_left = vx < 0.0 && new_x < bubble.radius;
    let past_right = vx > 0.0 && new_x > field.width - bubble.radius;
    if past_left || past_right {
        vx = -vx;
        new_x = bubble.x + vx * dt;
    }

    // Uses the pre-step y, so a bubble may sink slightly into the ground for a
    // single frame before it bounces.
    if bubble.radius + bubble.y > field.play_height {
        vy = -vy;
        new_y = bubble.y + vy * dt;
    }

    Bubble {
        x: new_x,
        y: new_y,
        vx,
        vy,
        ..bubble.clone()
    }
}

/// `None` once the bullet has left the top of the field.
pub fn bullet_next_step(bullet: &Bullet, dt: f64) -> Option<Bullet> {
    let new_y = bullet.y - bullet.speed * dt;
    if new_y < 0.0 {
        None
    } else {
        Some(Bullet {
            y: new_y,
            ..bullet.clone()
        })
    }
}

pub fn move_shooter(shooter: &Shooter, dt: f64, leftward: bool, field: &PlayField) -> Shooter {
    let direction = if leftward { -1.0 } else { 1.0 };
    let half = shooter.body_width / 2.0;
    let new_x = (shooter.x + direction * shooter.speed * dt).clamp(half, field.width - half);
    Shooter {
        x: new_x,
        ..shooter.clone()
    }
}

/// A new bullet at the centre of the shooter's head.
pub fn shoot(shooter: &Shooter, cfg: &BulletConfig) -> Bullet {
    let (x, y) = shooter.head_center();
    Bullet {
        x,
        y,
        width: cfg.width,
        height: cfg.height,
        speed: cfg.speed,
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Index of the first bullet (in scan order) overlapping `bubble`.
pub fn first_colliding_bullet(bubble: &Bubble, bullets: &[Bullet]) -> Option<usize> {
    bullets.iter().position(|b| {
        let dx = bubble.x - b.x;
        let dy = bubble.y - b.y;
        let reach = bubble.radius + b.width / 2.0;
        dx * dx + dy * dy < reach * reach
    })
}

/// Head: exact circle–circle.  Body: the bubble is treated as its bounding
/// square, which over-reports hits near the body's corners.
pub fn bubble_hits_shooter(bubble: &Bubble, shooter: &Shooter) -> bool {
    let (head_x, head_y) = shooter.head_center();
    let dx = bubble.x - head_x;
    let dy = bubble.y - head_y;
    let reach = bubble.radius + shooter.head_radius;
    if dx * dx + dy * dy < reach * reach {
        return true;
    }

    let (body_top, body_bottom) = shooter.body_y_range();
    let dx_body = (bubble.x - shooter.x).abs();
    dx_body < bubble.radius + shooter.body_width / 2.0
        && bubble.y - bubble.radius < body_bottom
        && bubble.y + bubble.radius > body_top
}

pub fn any_bubble_hits_shooter(bubbles: &[Bubble], shooter: &Shooter) -> bool {
    bubbles.iter().any(|b| bubble_hits_shooter(b, shooter))
}

// ── Splitting ────────────────────────────────────────────────────────────────

/// Two half-size children flying apart horizontally, or nothing when the
/// halves would fall below `threshold`.
pub fn split_bubble(bubble: &Bubble, threshold: f64) -> Vec<Bubble> {
    let radius = bubble.radius / 2.0;
    if radius < threshold {
        return Vec::new();
    }
    let speed = bubble.vx.abs();
    [speed, -speed]
        .into_iter()
        .map(|vx| Bubble {
            radius,
            vx,
            vy: 0.0,
            ..bubble.clone()
        })
        .collect()
}

// ── Per-frame steps ──────────────────────────────────────────────────────────

/// Dispatch one key press.  `Quit` is the driver's business; here it only
/// updates the `Cmd:` label, like any unrecognised key.
pub fn apply_input(round: &RoundState, key: KeyInput, cfg: &GameConfig) -> RoundState {
    let field = cfg.play_field();
    let dt = cfg.timing.step_time;
    let last_command = key.glyph.or(round.last_command);

    match key.action {
        InputAction::MoveLeft => RoundState {
            shooter: move_shooter(&round.shooter, dt, true, &field),
            last_command,
            ..round.clone()
        },
        InputAction::MoveRight => RoundState {
            shooter: move_shooter(&round.shooter, dt, false, &field),
            last_command,
            ..round.clone()
        },
        InputAction::Fire => {
            let mut bullets = round.bullets.clone();
            bullets.push(shoot(&round.shooter, &cfg.bullet));
            RoundState {
                bullets,
                last_command,
                ..round.clone()
            }
        }
        InputAction::Quit | InputAction::Unknown => RoundState {
            last_command,
            ..round.clone()
        },
    }
}

/// The label only changes when the countdown is within one decrement of a
/// whole second.
pub fn refresh_timer_label(round: &RoundState, timing: &TimingConfig) -> RoundState {
    let t = round.time_left;
    if t - t.floor() >= timing.timer_decrement {
        return round.clone();
    }
    let timer_label = timer_label_for(t, timing);
    if timer_label != round.timer_label {
        log::trace!("timer label -> {}s (urgent: {})", timer_label.seconds, timer_label.urgent);
    }
    RoundState {
        timer_label,
        ..round.clone()
    }
}

/// Each bubble consumes at most one bullet.  Bubbles are scanned from the
/// back so a bullet touching two bubbles goes to the later one.  Survivors
/// keep their order and children are appended after them.
pub fn resolve_bullet_hits(round: &RoundState, split_threshold: f64) -> RoundState {
    let mut bullets = round.bullets.clone();
    let mut popped = vec![false; round.bubbles.len()];
    let mut children = Vec::new();

    for (i, bubble) in round.bubbles.iter().enumerate().rev() {
        let Some(j) = first_colliding_bullet(bubble, &bullets) else {
            continue;
        };
        bullets.remove(j);
        popped[i] = true;
        let spawned = split_bubble(bubble, split_threshold);
        log::debug!(
            "bubble r={} popped at ({:.1}, {:.1}), {} children",
            bubble.radius,
            bubble.x,
            bubble.y,
            spawned.len()
        );
        children.extend(spawned);
    }

    let score_gain = popped.iter().filter(|&&p| p).count() as u32;
    let bubbles: Vec<Bubble> = round
        .bubbles
        .iter()
        .zip(&popped)
        .filter_map(|(b, &p)| (!p).then(|| b.clone()))
        .chain(children)
        .collect();

    RoundState {
        bubbles,
        bullets,
        score: round.score + score_gain,
        ..round.clone()
    }
}

/// Edge-triggered: one point of health per overlap, re-armed once the
/// shooter is clear of every bubble.
pub fn resolve_shooter_hits(round: &RoundState) -> RoundState {
    let overlapping = any_bubble_hits_shooter(&round.bubbles, &round.shooter);
    let (health, collision_counted) = match (overlapping, round.collision_counted) {
        (true, false) => {
            let health = round.health.saturating_sub(1);
            log::debug!("shooter hit, health {}/{}", health, round.max_health);
            (health, true)
        }
        (true, true) => (round.health, true),
        (false, _) => (round.health, false),
    };

    RoundState {
        shooter: Shooter {
            hit: overlapping,
            ..round.shooter.clone()
        },
        health,
        collision_counted,
        ..round.clone()
    }
}

/// Health is checked before the timer, and both before the win condition.
pub fn evaluate_round(round: &RoundState) -> RoundStatus {
    if round.health == 0 || round.time_left <= 0.0 {
        RoundStatus::Lost
    } else if round.bubbles.is_empty() {
        RoundStatus::Won
    } else {
        RoundStatus::Playing
    }
}

pub fn advance_entities(round: &RoundState, gravity: f64, cfg: &GameConfig) -> RoundState {
    let field = cfg.play_field();
    let dt = cfg.timing.step_time;
    RoundState {
        bubbles: round
            .bubbles
            .iter()
            .map(|b| bubble_next_step(b, dt, gravity, &field))
            .collect(),
        bullets: round
            .bullets
            .iter()
            .filter_map(|b| bullet_next_step(b, dt))
            .collect(),
        ..round.clone()
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  Only does anything while playing.
///
/// Order: input, timer label, bullet hits, shooter hits, end-of-round check,
/// then (if still playing) motion and the countdown.
pub fn tick(state: &GameState, key: Option<KeyInput>, cfg: &GameConfig) -> GameState {
    if state.phase != Phase::Playing {
        return state.clone();
    }

    let round = match key {
        Some(key) => apply_input(&state.round, key, cfg),
        None => state.round.clone(),
    };
    let round = refresh_timer_label(&round, &cfg.timing);
    let round = resolve_bullet_hits(&round, cfg.physics.split_threshold);
    let round = resolve_shooter_hits(&round);

    let status = evaluate_round(&round);
    let round = RoundState { status, ..round };

    match status {
        RoundStatus::Playing => {
            let round = advance_entities(&round, state.gravity, cfg);
            GameState {
                round: RoundState {
                    time_left: round.time_left - cfg.timing.timer_decrement,
                    ..round
                },
                ..state.clone()
            }
        }
        RoundStatus::Won => level_cleared(state, round, cfg),
        RoundStatus::Lost => {
            log::info!(
                "Level {} lost (health {}, {:.2}s left, score {})",
                state.level,
                round.health,
                round.time_left,
                round.score
            );
            GameState {
                phase: Phase::Defeat,
                round,
                ..state.clone()
            }
        }
    }
}

fn level_cleared(state: &GameState, round: RoundState, cfg: &GameConfig) -> GameState {
    log::info!("Level {} cleared with score {}", state.level, round.score);

    if state.level >= state.level_count {
        log::info!("All {} levels cleared", state.level_count);
        return GameState {
            phase: Phase::Victory,
            round,
            ..state.clone()
        };
    }

    let level = state.level + 1;
    GameState {
        level,
        gravity: state.gravity + cfg.physics.gravity_step,
        phase: Phase::LevelIntro,
        round: start_round(level, cfg),
        ..state.clone()
    }
}
