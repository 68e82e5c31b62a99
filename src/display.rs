/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and a read-only view of the
/// simulation.  No game logic is performed; this module only translates
/// entity positions and HUD counters into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::{Alien, AlienKind, FireMode, GameStatus, Level};
use crate::powerups::PowerUpKind;
use crate::sim::Simulation;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_SHIELD: Color = Color::Cyan;
const C_DRONE: Color = Color::Green;
const C_RAIDER: Color = Color::Yellow;
const C_OVERLORD: Color = Color::Red;
const C_SHOT_HOSTILE: Color = Color::Magenta;
const C_PARTICLE: Color = Color::DarkYellow;
const C_ARC: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Shot colour follows the special behavior so the strongest active
/// modifier is visible at a glance (same precedence as the state machine).
fn shot_color(mode: FireMode) -> Color {
    match mode {
        FireMode::Normal => Color::Cyan,
        FireMode::Pierce => Color::Yellow,
        FireMode::Split => Color::Magenta,
        FireMode::Chain => Color::White,
    }
}

fn item_glyph(kind: PowerUpKind) -> (&'static str, Color) {
    match kind {
        PowerUpKind::RapidFire => ("!", Color::Cyan),
        PowerUpKind::TripleShot => ("★", Color::Yellow),
        PowerUpKind::SpeedBoost => ("»", Color::Green),
        PowerUpKind::DoubleScore => ("$", Color::Yellow),
        PowerUpKind::Pierce => ("†", Color::White),
        PowerUpKind::Split => ("Y", Color::Magenta),
        PowerUpKind::Chain => ("ξ", Color::Cyan),
        PowerUpKind::Shield => ("◯", Color::Blue),
        PowerUpKind::Bomb => ("B", Color::Red),
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, sim: &Simulation) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, sim)?;
    draw_hud(out, sim)?;

    for (_, alien) in sim.aliens.iter() {
        draw_alien(out, sim, alien)?;
    }
    for (_, shot) in sim.player_bullets.iter() {
        out.queue(style::SetForegroundColor(shot_color(shot.mode)))?;
        put(out, sim, shot.x, shot.y, "║")?;
    }
    for (_, shot) in sim.alien_bullets.iter() {
        out.queue(style::SetForegroundColor(C_SHOT_HOSTILE))?;
        put(out, sim, shot.x, shot.y, "↓")?;
    }
    for (_, p) in sim.particles.iter() {
        out.queue(style::SetForegroundColor(C_PARTICLE))?;
        put(out, sim, p.x, p.y, "·")?;
    }
    for (_, item) in sim.items.iter() {
        if let Some(kind) = item.kind {
            let (glyph, color) = item_glyph(kind);
            // Pulse by blinking every quarter second
            if (item.pulse * 4.0) as u32 % 2 == 0 {
                out.queue(style::SetForegroundColor(color))?;
            } else {
                out.queue(style::SetForegroundColor(Color::White))?;
            }
            put(out, sim, item.x, item.y, glyph)?;
        }
    }
    for (_, arc) in sim.arcs.iter() {
        if arc.target.is_none() && arc.linger > 0.0 {
            out.queue(style::SetForegroundColor(C_ARC))?;
            put(out, sim, arc.x2, arc.y2, "⚡")?;
        }
    }

    draw_player(out, sim)?;
    draw_controls_hint(out, sim)?;

    match sim.status {
        GameStatus::Paused => draw_center_box(out, sim, &paused_lines())?,
        GameStatus::GameOver => draw_center_box(out, sim, &game_over_lines(sim))?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, (sim.height as u16).saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Print `s` at a world position, skipping anything outside the play field.
fn put<W: Write>(out: &mut W, sim: &Simulation, x: f32, y: f32, s: &str) -> std::io::Result<()> {
    let col = x.round() as i32;
    let row = y.round() as i32;
    if col < 1 || row < 2 || col >= sim.width as i32 - 1 || row >= sim.height as i32 - 2 {
        return Ok(());
    }
    out.queue(cursor::MoveTo(col as u16, row as u16))?;
    out.queue(Print(s))?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, sim: &Simulation) -> std::io::Result<()> {
    let w = sim.width as usize;
    let h = sim.height as u16;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo((sim.width as u16).saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, sim: &Simulation) -> std::io::Result<()> {
    let width = sim.width as u16;

    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>7}  Hi: {:>7}", sim.score, sim.high_score)))?;

    // Wave + level — centre
    let level_str = match sim.level {
        Level::Easy => "EASY",
        Level::Medium => "MEDIUM",
        Level::Hard => "HARD",
    };
    let wave_str = format!("[ WAVE {} · {} ]", sim.wave, level_str);
    let wx = (width / 2).saturating_sub(wave_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(&wave_str))?;

    // Lives + bombs — right
    let hearts: String = "♥".repeat(sim.player.lives as usize);
    let right = format!("Bombs: {}  Lives: {}", sim.powerups.bombs(), hearts);
    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&right))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, sim: &Simulation) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ▲       ← tip
    //  /█\      ← wings + hull
    let p = &sim.player;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    put(out, sim, p.x + 1.0, p.y, "▲")?;
    put(out, sim, p.x, p.y + 1.0, "/█\\")?;

    if sim.powerups.is_active(PowerUpKind::Shield, sim.now) {
        out.queue(style::SetForegroundColor(C_SHIELD))?;
        put(out, sim, p.x, p.y - 1.0, "◠◠◠")?;
    }
    Ok(())
}

fn draw_alien<W: Write>(out: &mut W, sim: &Simulation, alien: &Alien) -> std::io::Result<()> {
    // Two sprite frames per kind, flipped by the animation phase.
    let blink = (alien.anim * 2.0) as u32 % 2 == 0;
    let (top, bottom, color) = match alien.kind {
        AlienKind::Drone => (if blink { "<▼>" } else { ">▼<" }, "[_]", C_DRONE),
        AlienKind::Raider => (if blink { "(◉)" } else { "(-)" }, "\\-/", C_RAIDER),
        AlienKind::Overlord => (if blink { "{Ψ}" } else { "{ψ}" }, "/˄\\", C_OVERLORD),
    };
    // Armored members render dimmer once their armor is chipped.
    if alien.kind == AlienKind::Overlord && alien.armor <= 1 {
        out.queue(style::SetForegroundColor(Color::DarkRed))?;
    } else {
        out.queue(style::SetForegroundColor(color))?;
    }
    put(out, sim, alien.x, alien.y, top)?;
    put(out, sim, alien.x, alien.y + 1.0, bottom)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, sim: &Simulation) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, (sim.height as u16).saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE : Shoot   B : Bomb   P : Pause   Q : Quit",
    ))?;

    // Active timed power-ups, right-aligned
    let mut tags: Vec<String> = Vec::new();
    for kind in PowerUpKind::ALL {
        if let Some(left) = sim.powerups.remaining(kind, sim.now) {
            tags.push(format!("{:?} {:.0}s", kind, left.ceil()));
        }
    }
    if !tags.is_empty() {
        let text = tags.join("  ");
        let rx = (sim.width as u16).saturating_sub(text.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(rx, (sim.height as u16).saturating_sub(1)))?;
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(Print(&text))?;
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn paused_lines() -> Vec<(String, Color)> {
    vec![
        ("╔══════════════╗".to_string(), Color::Yellow),
        ("║    PAUSED    ║".to_string(), Color::Yellow),
        ("╚══════════════╝".to_string(), Color::Yellow),
        ("P - Resume".to_string(), Color::White),
    ]
}

fn game_over_lines(sim: &Simulation) -> Vec<(String, Color)> {
    vec![
        ("╔══════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER    ║".to_string(), Color::Red),
        ("╚══════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {}", sim.score), Color::Yellow),
        (format!("Wave Reached: {}", sim.wave), Color::Yellow),
        ("R - Play Again  M - Menu  Q - Quit".to_string(), Color::White),
    ]
}

fn draw_center_box<W: Write>(
    out: &mut W,
    sim: &Simulation,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let cx = sim.width as u16 / 2;
    let start_row = (sim.height as u16 / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg.as_str()))?;
    }
    Ok(())
}
