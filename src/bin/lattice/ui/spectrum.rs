//! Spectrum of the output on a log-frequency axis.
//!
//! The x axis is `log2(Hz)`, so equal musical intervals are equal distances
//! and the markers for sounding notes line up with their partials.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const SPECTRUM_BINS: usize = 96;
const MIN_FREQ: f64 = 20.0;
const FLOOR_DB: f64 = -100.0;
/// Per-update fall of the displayed level, in dB.
const DECAY_DB: f64 = 3.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin read for each display point.
    bin_indices: Vec<usize>,
    /// `(log2 Hz, dB)` per display point, with a falling peak hold.
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();

        let max_freq = (f64::from(sample_rate) / 2.0).clamp(MIN_FREQ + 1.0, 20_000.0);
        let (lo, hi) = (MIN_FREQ.log2(), max_freq.log2());
        let last_bin = buffer_len / 2 - 1;

        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let octave = lo + (hi - lo) * i as f64 / (SPECTRUM_BINS - 1) as f64;
            let index = (octave.exp2() * buffer_len as f64 / f64::from(sample_rate)).round() as usize;
            bin_indices.push(index.min(last_bin));
            spectrum.push((octave, FLOOR_DB));
        }

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            bin_indices,
            spectrum,
        }
    }

    /// Analyse `buffer`; ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        // Hann window coherent gain is 0.5
        let norm = 2.0 / (self.window.len() as f32 * 0.5);
        for (point, &index) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            let magnitude = (self.scratch[index].norm() * norm).max(1e-6);
            let db = 20.0 * f64::from(magnitude).log10();
            point.1 = db.max(point.1 - DECAY_DB).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }

    /// Axis range in `log2 Hz`.
    pub fn bounds(&self) -> [f64; 2] {
        let first = self.spectrum.first().map_or(MIN_FREQ.log2(), |p| p.0);
        let last = self.spectrum.last().map_or(first + 1.0, |p| p.0);
        [first, last]
    }
}

/// `notes` are the frequencies currently held, drawn as markers along the top.
pub fn render_spectrum(frame: &mut Frame, area: Rect, analyzer: &SpectrumAnalyzer, notes: &[f64]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let markers: Vec<(f64, f64)> = notes.iter().map(|hz| (hz.log2(), -6.0)).collect();
    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(analyzer.data()),
        Dataset::default()
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&markers),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds(analyzer.bounds())
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
