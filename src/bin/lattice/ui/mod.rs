//! Terminal front-end for the lattice explorer.
//!
//! Draws the lattice, the output scope and spectrum, and turns key and mouse
//! events into explorer operations.

mod lattice;
pub mod state;
mod spectrum;
mod transport;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use lattice_tuner::synth::CommandSink;

use crate::explorer::{Explorer, Layout as LatticeLayout};

pub use state::{AudioStats, EngineStatus};

use lattice::{cell_to_point, render_lattice};
use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, TransportView};
use waveform::render_waveform;

/// Samples kept for the scope and the FFT.
const VIS_BUFFER_SIZE: usize = 2048;
const ZOOM_STEP: f64 = 1.25;

const HELP: &str = " [Q] Quit  [Arrows/Tab] Move  [Space] Play  [S] Stop  [M] Mode  \
                    [1-4] Layout  [B] Basis  [+/-] Zoom  [P/p ]/[] Divisions  [J] JI  [G] Guides  [N] Step labels";

pub struct UiApp<S: CommandSink> {
    explorer: Explorer<S>,
    /// Mono output samples tapped from the audio callback
    audio_rx: Consumer<f32>,
    status_rx: Consumer<EngineStatus>,
    engine: EngineStatus,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    sample_rate: f32,
    ceiling: f32,
    started: Instant,
    /// Where the lattice was last drawn, for mapping mouse cells.
    lattice_area: Rect,
    should_quit: bool,
}

impl<S: CommandSink> UiApp<S> {
    pub fn new(
        explorer: Explorer<S>,
        audio_rx: Consumer<f32>,
        status_rx: Consumer<EngineStatus>,
        sample_rate: f32,
        ceiling: f32,
    ) -> Self {
        Self {
            explorer,
            audio_rx,
            status_rx,
            engine: EngineStatus::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            sample_rate,
            ceiling,
            started: Instant::now(),
            lattice_area: Rect::default(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_status();
            self.explorer
                .advance_clock(self.started.elapsed().as_secs_f64());

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        self.explorer.stop_all();
        Ok(())
    }

    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }

        if received {
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
            self.spectrum.update(&self.audio_buffer);
        }
    }

    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.engine = status;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let explorer = &mut self.explorer;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left => explorer.move_selection(-1, 0),
            KeyCode::Right => explorer.move_selection(1, 0),
            KeyCode::Up => explorer.move_selection(0, 1),
            KeyCode::Down => explorer.move_selection(0, -1),
            KeyCode::Tab => explorer.cycle_selection(true),
            KeyCode::BackTab => explorer.cycle_selection(false),
            KeyCode::Char(' ') | KeyCode::Enter => explorer.trigger(),
            KeyCode::Char('s') => explorer.stop_all(),
            KeyCode::Char('m') => explorer.toggle_play_mode(),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                explorer.apply_layout(LatticeLayout::ALL[index]);
            }
            KeyCode::Char('b') => explorer.cycle_preimage(),
            KeyCode::Char('+') | KeyCode::Char('=') => explorer.zoom_by(ZOOM_STEP),
            KeyCode::Char('-') => explorer.zoom_by(1.0 / ZOOM_STEP),
            KeyCode::Char('P') => explorer.adjust_p(1),
            KeyCode::Char('p') => explorer.adjust_p(-1),
            KeyCode::Char(']') => explorer.adjust_q(1),
            KeyCode::Char('[') => explorer.adjust_q(-1),
            KeyCode::Char('j') => explorer.toggle_just_intonation(),
            KeyCode::Char('g') => explorer.toggle_guides(),
            KeyCode::Char('n') => explorer.toggle_steps(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let point = cell_to_point(self.lattice_area, mouse.column, mouse.row);
        match (mouse.kind, point) {
            (MouseEventKind::Down(MouseButton::Left), Some(point)) => self.explorer.press_at(point),
            (MouseEventKind::Drag(MouseButton::Left), Some(point)) => self.explorer.drag_to(point),
            (MouseEventKind::Up(MouseButton::Left), _) => self.explorer.release(),
            (MouseEventKind::ScrollUp, Some(_)) => self.explorer.zoom_by(ZOOM_STEP),
            (MouseEventKind::ScrollDown, Some(_)) => self.explorer.zoom_by(1.0 / ZOOM_STEP),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(10),   // Lattice
                Constraint::Length(8), // Scope + spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        let pool = self.explorer.pool();
        let transport = TransportView {
            val: self.explorer.val(),
            play_mode: self.explorer.play_mode(),
            playing: pool.active_count(),
            capacity: pool.capacity(),
            engine: &self.engine,
            sample_rate: self.sample_rate,
            stats: &stats,
            message: self.explorer.status(),
        };
        render_transport(frame, chunks[0], &transport);

        let title = match self.explorer.selected_note() {
            Some(note) => format!(" Lattice  {}  {} ", note, note.monzo()),
            None => " Lattice ".to_string(),
        };
        let lattice_block = Block::default().title(title).borders(Borders::ALL);
        self.lattice_area = lattice_block.inner(chunks[1]);
        frame.render_widget(lattice_block, chunks[1]);
        render_lattice(frame, self.lattice_area, &self.explorer);

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, scopes[0], &self.audio_buffer, self.ceiling);
        render_spectrum(
            frame,
            scopes[1],
            &self.spectrum,
            &self.explorer.pool().frequencies(),
        );

        let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
