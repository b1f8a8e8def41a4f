/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// frame.  No game logic is performed; this module only translates draw
/// commands and audio cues into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use coin_dodge::entities::{Cue, DrawCommand, Layer, Playfield, SpriteKind, Tint};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_KNIGHT: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_COIN: Color = Color::Yellow;
const C_HEART: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

const HINT: &str = "WASD / arrows : Move   Q : Quit";

/// Rows above the playfield reserved for the HUD.
pub const HUD_ROWS: u16 = 1;

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Glyph rows for each sprite.  Spaces are transparent.
fn glyphs(kind: SpriteKind) -> (&'static [&'static str], Color) {
    match kind {
        SpriteKind::Knight => (&[" @ ", "/|\\"][..], C_KNIGHT),
        SpriteKind::Enemy => (&["<##>", "/vv\\"][..], C_ENEMY),
        SpriteKind::Coin => (&["()"][..], C_COIN),
        SpriteKind::Heart => (&["♥"][..], C_HEART),
    }
}

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Yellow => Color::Yellow,
        Tint::Red => Color::Red,
    }
}

/// Playfield the controller should simulate for a terminal of this size.
pub fn playfield_for(cols: u16, rows: u16) -> Playfield {
    Playfield::new(cols as f32, rows.saturating_sub(HUD_ROWS) as f32)
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame onto a `cols` × `rows` terminal.
pub fn render<W: Write>(
    out: &mut W,
    draws: &[DrawCommand],
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_controls_hint(out, cols)?;

    for draw in draws {
        match draw {
            DrawCommand::Sprite { kind, x, y, layer } => {
                let (lines, color) = glyphs(*kind);
                out.queue(style::SetForegroundColor(color))?;
                for (i, line) in lines.iter().enumerate() {
                    blit(out, line, *x, *y + i as f32, *layer, cols, rows)?;
                }
            }
            DrawCommand::Text { text, x, y, tint, layer } => {
                out.queue(style::SetForegroundColor(tint_color(*tint)))?;
                blit(out, text, *x, *y, *layer, cols, rows)?;
            }
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// One terminal bell per cue.
pub fn play_cues<W: Write>(out: &mut W, cues: &[Cue]) -> std::io::Result<()> {
    for cue in cues {
        tracing::trace!(?cue, "bell");
        out.queue(Print('\x07'))?;
    }
    if !cues.is_empty() {
        out.flush()?;
    }
    Ok(())
}

// ── Blitting ──────────────────────────────────────────────────────────────────

/// Print `text` at a fractional cell position, clipped to the screen.
/// Entities sliding off the left edge stay partly visible.
fn blit<W: Write>(
    out: &mut W,
    text: &str,
    x: f32,
    y: f32,
    layer: Layer,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let row = match layer {
        Layer::Hud => y.round() as i32,
        Layer::Playfield => y.round() as i32 + HUD_ROWS as i32,
    };
    if row < 0 || row >= rows as i32 {
        return Ok(());
    }

    let start = x.round() as i32;
    for (i, ch) in text.chars().enumerate() {
        let col = start + i as i32;
        if ch == ' ' || col < 0 {
            continue;
        }
        if col >= cols as i32 {
            break;
        }
        out.queue(cursor::MoveTo(col as u16, row as u16))?;
        out.queue(Print(ch))?;
    }
    Ok(())
}

// ── Controls hint (HUD row, centred) ──────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, cols: u16) -> std::io::Result<()> {
    let len = HINT.chars().count() as u16;
    // Leave room for hearts on the left and the score on the right.
    if cols < len + 20 {
        return Ok(());
    }
    out.queue(cursor::MoveTo((cols - len) / 2, 0))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(HINT))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(draws: &[DrawCommand], cols: u16, rows: u16) -> String {
        let mut buf: Vec<u8> = Vec::new();
        render(&mut buf, draws, cols, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn playfield_excludes_hud_row() {
        let pf = playfield_for(80, 24);
        assert_eq!(pf.width, 80.0);
        assert_eq!(pf.height, 23.0);
    }

    #[test]
    fn text_is_written() {
        let draws = vec![DrawCommand::Text {
            text: "GAME OVER".to_string(),
            x: 10.0,
            y: 5.0,
            tint: Tint::Red,
            layer: Layer::Playfield,
        }];
        let out = rendered(&draws, 40, 20);
        for ch in ['G', 'A', 'M', 'E', 'O', 'V', 'R'] {
            assert!(out.contains(ch));
        }
    }

    #[test]
    fn sprite_off_left_edge_is_clipped() {
        // Only the last column of "<##>" and "/vv\" remains on screen.
        let draws = vec![DrawCommand::Sprite {
            kind: SpriteKind::Enemy,
            x: -3.0,
            y: 2.0,
            layer: Layer::Playfield,
        }];
        let out = rendered(&draws, 40, 20);
        assert!(out.contains('>'));
        assert!(out.contains('\\'));
        assert!(!out.contains('<'));
        assert!(!out.contains('#'));
    }

    #[test]
    fn draws_below_screen_are_dropped() {
        let draws = vec![DrawCommand::Sprite {
            kind: SpriteKind::Coin,
            x: 1.0,
            y: 50.0,
            layer: Layer::Playfield,
        }];
        let out = rendered(&draws, 40, 20);
        assert!(!out.contains('('));
    }

    #[test]
    fn one_bell_per_cue() {
        let mut buf: Vec<u8> = Vec::new();
        play_cues(&mut buf, &[Cue::Hit, Cue::CoinPickup]).unwrap();
        assert_eq!(buf.iter().filter(|&&b| b == 0x07).count(), 2);
    }

    #[test]
    fn no_cues_writes_nothing() {
        let mut buf: Vec<u8> = Vec::new();
        play_cues(&mut buf, &[]).unwrap();
        assert!(buf.is_empty());
    }
}
