//! Status bar: tuning, play mode, voices and output level.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use lattice_tuner::{synth::PlayMode, tuning::Val};

use super::state::{AudioStats, EngineStatus};

/// Everything the status bar shows for one frame.
pub struct TransportView<'a> {
    pub val: &'a Val,
    pub play_mode: PlayMode,
    /// Notes the control side considers playing.
    pub playing: usize,
    pub capacity: usize,
    pub engine: &'a EngineStatus,
    pub sample_rate: f32,
    pub stats: &'a AudioStats,
    pub message: &'a str,
}

pub fn render_transport(frame: &mut Frame, area: Rect, view: &TransportView<'_>) {
    let block = Block::default().title(" lattice ").borders(Borders::ALL);

    let mode_color = match view.play_mode {
        PlayMode::Hold => Color::Green,
        PlayMode::Toggle => Color::Yellow,
    };
    let reduction_color = if view.engine.reduction_db < -1.0 {
        Color::Red
    } else {
        Color::DarkGray
    };

    let line = Line::from(vec![
        Span::styled(format!(" {}  ", view.val), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("[{}]  ", view.play_mode.label()),
            Style::default().fg(mode_color),
        ),
        Span::styled(
            format!(
                "Voices {}/{} ({} held, {} sounding)  ",
                view.playing, view.capacity, view.engine.held, view.engine.sounding
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "{:.1}kHz {:.0}s  ",
                view.sample_rate / 1000.0,
                view.engine.frames as f32 / view.sample_rate.max(1.0)
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Gain {:.2}  ", view.engine.master_gain),
            Style::default().fg(Color::Blue),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}  ", view.stats.peak, view.stats.rms),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("GR {:.1}dB  ", view.engine.reduction_db),
            Style::default().fg(reduction_color),
        ),
        Span::styled(view.message.to_string(), Style::default().fg(Color::Gray)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
