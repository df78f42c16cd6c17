//! Lattice canvas: guides, notes coloured by pitch class, selection cursor.
//!
//! Drawing coordinates are the projected lattice points, y growing
//! downwards like screen rows. One terminal cell spans `CELL_WIDTH` by
//! `CELL_HEIGHT` drawing units, so the default zoom of 100 puts neighbouring
//! notes about a dozen columns apart.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::canvas::{Canvas, Circle, Line},
    Frame,
};

use lattice_tuner::{
    geometry::{project, GuideKind, Vector},
    synth::CommandSink,
};

use crate::explorer::Explorer;

pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

/// Drawing coordinates of the centre of a terminal cell, if it lies in `area`.
pub fn cell_to_point(area: Rect, column: u16, row: u16) -> Option<Vector> {
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    if !inside {
        return None;
    }
    let x = (f64::from(column - area.x) + 0.5 - f64::from(area.width) / 2.0) * CELL_WIDTH;
    let y = (f64::from(row - area.y) + 0.5 - f64::from(area.height) / 2.0) * CELL_HEIGHT;
    Some(Vector::new(x, y))
}

/// Fully saturated colour for a hue angle in degrees.
pub fn hue_color(hue: f64) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let (lightness, saturation) = (0.6, 0.8);
    let chroma = (1.0 - (2.0 * lightness - 1.0_f64).abs()) * saturation;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}

pub fn render_lattice<S: CommandSink>(frame: &mut Frame, area: Rect, explorer: &Explorer<S>) {
    let half_width = f64::from(area.width) * CELL_WIDTH / 2.0;
    let half_height = f64::from(area.height) * CELL_HEIGHT / 2.0;
    let matrix = explorer.view_matrix();
    let show_steps = explorer.view().show_steps;
    let selected = explorer.selected_note().map(|note| note.monzo());
    let guides = if explorer.view().show_guides {
        explorer.guides()
    } else {
        Vec::new()
    };

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-half_width, half_width])
        .y_bounds([-half_height, half_height])
        .paint(|ctx| {
            for guide in &guides {
                let color = match guide.kind {
                    GuideKind::Pitch => Color::DarkGray,
                    GuideKind::Period => Color::Rgb(60, 60, 90),
                };
                ctx.draw(&Line {
                    x1: guide.from.x,
                    y1: -guide.from.y,
                    x2: guide.to.x,
                    y2: -guide.to.y,
                    color,
                });
            }

            for note in explorer.notes() {
                if explorer.is_sounding(note) {
                    let at = project(note.monzo(), &matrix);
                    ctx.draw(&Circle {
                        x: at.x,
                        y: -at.y,
                        radius: CELL_HEIGHT,
                        color: hue_color(note.hue()),
                    });
                }
            }
            ctx.layer();

            for note in explorer.notes() {
                let at = project(note.monzo(), &matrix);
                let mut text = match note.steps() {
                    Some(steps) if show_steps => format!("{} {}", note.label(), steps),
                    _ => note.label(),
                };
                let mut style = Style::default().fg(hue_color(note.hue()));
                if explorer.is_sounding(note) {
                    style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                }
                if selected == Some(note.monzo()) {
                    text = format!("[{text}]");
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                let x = at.x - text.chars().count() as f64 * CELL_WIDTH / 2.0;
                ctx.print(x, -at.y, Span::styled(text, style));
            }
        });

    frame.render_widget(canvas, area);
}
