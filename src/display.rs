/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// world coordinates into terminal cells and state into terminal commands.

use std::io::Write;
use std::ops::Range;

use bubble_trouble::config::GameConfig;
use bubble_trouble::entities::{
    Bubble, Bullet, GameState, Phase, PlayField, Rgb, RoundState, Shooter,
};
use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GROUND: Color = Color::Rgb { r: 0, g: 0, b: 255 };
const C_TEXT: Color = Color::White;
const C_WARN: Color = Color::Rgb { r: 227, g: 39, b: 39 };
const C_FLASH: Color = Color::Rgb { r: 20, g: 20, b: 255 };
const C_BULLET: Color = Color::White;
const C_WIN: Color = Color::Rgb { r: 0, g: 255, b: 0 };
const C_LOSS: Color = Color::Rgb { r: 255, g: 0, b: 0 };
const C_HINT: Color = Color::DarkGrey;

// ── Label anchors (world units, text centred on them) ─────────────────────────

const LEFT_MARGIN: f64 = 70.0;
const TOP_MARGIN: f64 = 20.0;
/// Distance of the bottom labels below the ground line.
const BOTTOM_OFFSET: f64 = 20.0;

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── World → terminal mapping ──────────────────────────────────────────────────

/// Scales the world window onto the whole terminal.
struct Viewport {
    cols: u16,
    rows: u16,
    sx: f64,
    sy: f64,
}

impl Viewport {
    fn new(field: &PlayField, cols: u16, rows: u16) -> Self {
        Viewport {
            cols,
            rows,
            sx: f64::from(cols) / field.width,
            sy: f64::from(rows) / field.height,
        }
    }

    fn cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = (x * self.sx).floor();
        let row = (y * self.sy).floor();
        if col < 0.0 || row < 0.0 || col >= f64::from(self.cols) || row >= f64::from(self.rows) {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// World coordinates of a cell's centre.
    fn centre(&self, col: u16, row: u16) -> (f64, f64) {
        ((f64::from(col) + 0.5) / self.sx, (f64::from(row) + 0.5) / self.sy)
    }

    /// Cells whose centres fall inside the given world-space box.
    /// Terminal rows covering world span `[y0, y1)`.
    fn rows_in(&self, y0: f64, y1: f64) -> Range<u16> {
        let r0 = (y0 * self.sy).floor().max(0.0) as u16;
        let r1 = ((y1 * self.sy).ceil().max(0.0) as u16).min(self.rows);
        r0..r1
    }

    fn cells_in(
        &self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> impl Iterator<Item = (u16, u16)> + '_ {
        let c0 = (x0 * self.sx).floor().max(0.0) as u16;
        let c1 = ((x1 * self.sx).ceil().max(0.0) as u16).min(self.cols);
        self.rows_in(y0, y1)
            .flat_map(move |row| (c0..c1).map(move |col| (col, row)))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, cfg: &GameConfig) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let field = cfg.play_field();
    let view = Viewport::new(&field, cols, rows);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_ground(out, &view, &field)?;

    let round = &state.round;
    if state.phase != Phase::LevelIntro {
        for bubble in &round.bubbles {
            draw_bubble(out, &view, bubble)?;
        }
        for bullet in &round.bullets {
            draw_bullet(out, &view, bullet)?;
        }
    }
    draw_shooter(out, &view, &round.shooter)?;
    draw_hud(out, &view, &field, state)?;

    match state.phase {
        Phase::LevelIntro => {
            let flash = format!("Level {}!", state.level);
            draw_label(out, &view, field.width / 2.0, field.height / 2.0, &flash, C_FLASH)?;
        }
        Phase::Playing => {}
        Phase::Victory => draw_end_screen(out, &view, &field, "Congratulations!!", C_WIN)?,
        Phase::Defeat => draw_end_screen(out, &view, &field, "Game Over", C_LOSS)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Field ─────────────────────────────────────────────────────────────────────

fn draw_ground<W: Write>(out: &mut W, view: &Viewport, field: &PlayField) -> std::io::Result<()> {
    let Some((_, row)) = view.cell(0.0, field.play_height) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(0, row))?;
    out.queue(style::SetForegroundColor(C_GROUND))?;
    out.queue(Print("─".repeat(view.cols as usize)))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Fill every cell whose centre is inside the circle; tiny circles still get
/// one cell so they never vanish.
fn draw_disc<W: Write>(
    out: &mut W,
    view: &Viewport,
    cx: f64,
    cy: f64,
    radius: f64,
    color: Color,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    let mut drawn = false;
    for (col, row) in view.cells_in(cx - radius, cy - radius, cx + radius, cy + radius) {
        let (wx, wy) = view.centre(col, row);
        let (dx, dy) = (wx - cx, wy - cy);
        if dx * dx + dy * dy <= radius * radius {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("█"))?;
            drawn = true;
        }
    }
    if !drawn {
        if let Some((col, row)) = view.cell(cx, cy) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("●"))?;
        }
    }
    Ok(())
}

fn draw_bubble<W: Write>(out: &mut W, view: &Viewport, bubble: &Bubble) -> std::io::Result<()> {
    draw_disc(out, view, bubble.x, bubble.y, bubble.radius, rgb(bubble.color))
}

fn draw_bullet<W: Write>(out: &mut W, view: &Viewport, bullet: &Bullet) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(bullet.x, bullet.y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_BULLET))?;
    let (top, bottom) = bullet.y_range();
    let rows = view.rows_in(top, bottom);
    if rows.is_empty() {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("║"))?;
    }
    for r in rows {
        out.queue(cursor::MoveTo(col, r))?;
        out.queue(Print("║"))?;
    }
    Ok(())
}

fn draw_shooter<W: Write>(out: &mut W, view: &Viewport, shooter: &Shooter) -> std::io::Result<()> {
    let color = rgb(shooter.color());

    // Body
    let half_w = shooter.body_width / 2.0;
    let (top, bottom) = shooter.body_y_range();
    out.queue(style::SetForegroundColor(color))?;
    let mut drawn = false;
    for (col, row) in view.cells_in(shooter.x - half_w, top, shooter.x + half_w, bottom) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("█"))?;
        drawn = true;
    }
    if !drawn {
        if let Some((col, row)) = view.cell(shooter.x, shooter.y) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("▀"))?;
        }
    }

    // Head
    let (hx, hy) = shooter.head_center();
    draw_disc(out, view, hx, hy, shooter.head_radius, color)
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// Text centred on a world-space anchor.
fn draw_label<W: Write>(
    out: &mut W,
    view: &Viewport,
    x: f64,
    y: f64,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = ((x * view.sx) as u16).saturating_sub(text.chars().count() as u16 / 2);
    let row = ((y * view.sy) as u16).min(view.rows.saturating_sub(1));
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_hud<W: Write>(
    out: &mut W,
    view: &Viewport,
    field: &PlayField,
    state: &GameState,
) -> std::io::Result<()> {
    let round: &RoundState = &state.round;
    let right = field.width - LEFT_MARGIN;
    let bottom = field.play_height + BOTTOM_OFFSET;

    // Timer — top left
    let timer = format!("Timer: {:>2} sec", round.timer_label.seconds);
    let timer_color = if round.timer_label.urgent { C_WARN } else { C_TEXT };
    draw_label(out, view, LEFT_MARGIN, TOP_MARGIN, &timer, timer_color)?;

    // Health — top right
    let health = format!("Health: {}/{}", round.health, round.max_health);
    let health_color = if round.health <= 1 { C_WARN } else { C_TEXT };
    draw_label(out, view, right, TOP_MARGIN, &health, health_color)?;

    // Last command — bottom left
    let cmd = format!("Cmd: {}", round.last_command.unwrap_or('_'));
    draw_label(out, view, LEFT_MARGIN, bottom, &cmd, C_TEXT)?;

    // Level — bottom centre
    let level = format!("Level: {}/{}", state.level, state.level_count);
    draw_label(out, view, field.width / 2.0, bottom, &level, C_TEXT)?;

    // Score — bottom right
    let score = format!("Score: {:>2}", round.score);
    draw_label(out, view, right, bottom, &score, C_TEXT)?;

    Ok(())
}

// ── End screens ───────────────────────────────────────────────────────────────

fn draw_end_screen<W: Write>(
    out: &mut W,
    view: &Viewport,
    field: &PlayField,
    message: &str,
    color: Color,
) -> std::io::Result<()> {
    let (cx, cy) = (field.width / 2.0, field.height / 2.0);
    draw_label(out, view, cx, cy, message, color)?;
    let hint_y = cy + 2.0 / view.sy;
    draw_label(out, view, cx, hint_y, "press any key to exit", C_HINT)
}
