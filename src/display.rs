//! Rendering layer: all terminal output lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session or menu state. No game logic happens here; world coordinates are
//! scaled onto whatever terminal grid is available.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use space_invaders::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use space_invaders::{BulletOwner, Explosion, FrameHandle, Preset, Session};

// ── Colour palette ───────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_FOCUS: Color = Color::White;

pub const MENU_ITEMS: [&str; 3] = ["Start", "Settings", "Quit"];

/// Terminal cell for a world point, inside the border.
fn to_cell(x: i32, y: i32, width: u16, height: u16) -> (u16, u16) {
    let inner_w = i64::from(width.saturating_sub(2).max(1));
    let inner_h = i64::from(height.saturating_sub(4).max(1));
    let col = 1 + (i64::from(x.clamp(0, SCREEN_WIDTH - 1)) * inner_w / i64::from(SCREEN_WIDTH));
    let row = 2 + (i64::from(y.clamp(0, SCREEN_HEIGHT - 1)) * inner_h / i64::from(SCREEN_HEIGHT));
    (col as u16, row as u16)
}

fn difficulty_color(preset: Preset) -> Color {
    match preset {
        Preset::Easy => Color::Green,
        Preset::Normal => Color::Yellow,
        Preset::Hard => Color::Red,
    }
}

fn print_centered<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn finish<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()
}

// ── Play screen ──────────────────────────────────────────────────────────────

/// Render one complete frame of play.
pub fn render_game<W: Write>(
    out: &mut W,
    session: &Session,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, session, width)?;

    for enemy in session.formation().alive() {
        let (col, row) = to_cell(enemy.rect.x, enemy.rect.y, width, height);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(C_ENEMY))?;
        out.queue(Print("«▼»"))?;
    }
    for bullet in session.bullets().iter().filter(|b| b.alive) {
        let (cx, cy) = bullet.rect.center();
        let (col, row) = to_cell(cx, cy, width, height);
        out.queue(cursor::MoveTo(col, row))?;
        match bullet.owner {
            BulletOwner::Player => {
                out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
                out.queue(Print("║"))?;
            }
            BulletOwner::Enemy => {
                out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
                out.queue(Print("↓"))?;
            }
        }
    }
    for effect in session.effects() {
        draw_explosion(out, effect, width, height)?;
    }

    let player = session.player();
    if player.alive {
        // Sprite (2 rows, 3 cols):
        //   ▲
        //  /█\
        let (cx, top) = player.rect.midtop();
        let (col, row) = to_cell(cx, top, width, height);
        out.queue(style::SetForegroundColor(C_PLAYER))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("▲"))?;
        if row + 1 < height.saturating_sub(2) {
            out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
            out.queue(Print("/█\\"))?;
        }
    }

    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("A D / ← → steer   SPACE fire   ESC menu   Q quit"))?;

    if session.is_game_over() {
        draw_game_over(out, session, width, height)?;
    }

    finish(out, height)
}

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, session: &Session, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", session.score())))?;

    let preset = session.preset();
    let tag = format!("[ {} ]", preset.name().to_uppercase());
    print_centered(out, width, 0, &tag, difficulty_color(preset))?;

    let level = format!("Level:{:>3}", session.level());
    let col = width.saturating_sub(level.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(level))?;
    Ok(())
}

fn draw_explosion<W: Write>(
    out: &mut W,
    effect: &Explosion,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let Some(FrameHandle(frame)) = effect.current_frame() else {
        return Ok(());
    };
    let glyph = if frame == 0 { "✺" } else { "·" };
    let (cx, cy) = effect.center();
    let (col, row) = to_cell(cx, cy, width, height);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_EXPLOSION))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    session: &Session,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", session.score());
    let level_line = format!("Reached level {}", session.level());
    let lines: [(&str, Color); 6] = [
        ("┏━━━━━━━━━━━━━━━━━━━━━━┓", Color::Red),
        ("┃   EARTH HAS FALLEN   ┃", Color::Red),
        ("┗━━━━━━━━━━━━━━━━━━━━━━┛", Color::Red),
        (score_line.as_str(), Color::Yellow),
        (level_line.as_str(), Color::DarkGrey),
        ("Enter - Play Again  Esc - Menu", Color::White),
    ];

    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        print_centered(out, width, start_row + i as u16, text, *color)?;
    }
    Ok(())
}

// ── Menu & settings ──────────────────────────────────────────────────────────

pub fn render_menu<W: Write>(
    out: &mut W,
    focus: usize,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cy = height / 2;

    print_centered(out, width, cy.saturating_sub(5), "★  SPACE  INVADERS  ★", Color::Cyan)?;
    for (i, label) in MENU_ITEMS.iter().enumerate() {
        let (text, color) = if i == focus {
            (format!("▶ {label} ◀"), C_FOCUS)
        } else {
            (format!("  {label}  "), C_HINT)
        };
        print_centered(out, width, cy.saturating_sub(2) + 2 * i as u16, &text, color)?;
    }
    print_centered(
        out,
        width,
        cy + 5,
        "↑ ↓ : Select   ENTER : Confirm   ESC : Quit",
        C_HINT,
    )?;

    finish(out, height)
}

/// Settings focus slots: 0..=2 difficulty buttons, 3 back, 4 volume slider.
pub fn render_settings<W: Write>(
    out: &mut W,
    focus: usize,
    preset: Preset,
    volume: f32,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cx = width / 2;
    let cy = height / 2;

    print_centered(out, width, cy.saturating_sub(6), "SETTINGS", Color::Cyan)?;
    print_centered(
        out,
        width,
        cy.saturating_sub(4),
        &format!("Difficulty: {preset}"),
        difficulty_color(preset),
    )?;

    // Difficulty buttons on one row
    let row = cy.saturating_sub(2);
    let mut col = cx.saturating_sub(18);
    for (i, option) in Preset::ALL.iter().enumerate() {
        let label = if i == focus {
            format!("[{:^8}]", option.name())
        } else {
            format!(" {:^8} ", option.name())
        };
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(if i == focus {
            C_FOCUS
        } else {
            difficulty_color(*option)
        }))?;
        out.queue(Print(&label))?;
        col += 12;
    }

    // Volume slider
    const SLIDER_CELLS: usize = 20;
    let filled = (volume.clamp(0.0, 1.0) * SLIDER_CELLS as f32).round() as usize;
    let slider = format!(
        "SFX {}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(SLIDER_CELLS - filled),
        (volume * 100.0).round() as u32
    );
    let slider_color = if focus == 4 { C_FOCUS } else { C_HINT };
    print_centered(out, width, cy + 1, &slider, slider_color)?;

    let back = if focus == 3 { "▶ Back ◀" } else { "  Back  " };
    print_centered(out, width, cy + 3, back, if focus == 3 { C_FOCUS } else { C_HINT })?;

    print_centered(
        out,
        width,
        cy + 6,
        "← → : Move / Adjust   ↑ ↓ : Row   ENTER : Choose   ESC : Back",
        C_HINT,
    )?;

    finish(out, height)
}
