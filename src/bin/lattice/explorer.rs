//! Control-thread context: tuning, notes, layout and the voice registry.
//!
//! Everything the UI mutates lives here and is passed around explicitly.
//! The audio side is only reached through the pool's command sink.

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::{debug, info, warn};

use lattice_tuner::{
    geometry::{
        effective_transform, guide_lines, nearest_note, BasisEditor, Clock, Guide, Matrix,
        Transition, Vector,
    },
    lattice::{generate_notes, Note, NoteRange},
    synth::{CommandSink, PlayMode, VoicePool},
    tuning::{companion_steps, Monzo, TuningMode, Val},
    Result,
};

use crate::config::{AppConfig, TuningConfig, ViewConfig};

/// Repetitions of the background grid on each side of the origin.
const GUIDE_COUNT: u32 = 5;
const GUIDE_EXTENT: f64 = 12.0;

/// Pre-image handles `b` cycles through.
const PREIMAGES: [Matrix; 4] = [
    Matrix::new(2.0, -1.0, -1.0, 1.0),
    Matrix::IDENTITY,
    Matrix::new(1.0, 0.0, -1.0, 1.0),
    Matrix::new(3.0, -2.0, -1.0, 1.0),
];

/// Canned layouts, each an effective transform in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The layout of the configured handles.
    Configured,
    /// Period to the right, second generator up.
    Monzo,
    /// Horizontal position follows pitch, one period per unit.
    Pitch,
    /// Rows sheared half a step, as on a hex keyboard.
    Hex,
}

impl Layout {
    pub const ALL: [Layout; 4] = [Layout::Configured, Layout::Monzo, Layout::Pitch, Layout::Hex];

    pub fn label(self) -> &'static str {
        match self {
            Layout::Configured => "configured",
            Layout::Monzo => "monzo",
            Layout::Pitch => "pitch",
            Layout::Hex => "hex",
        }
    }

    fn transform(self, val: &Val, view: &ViewConfig) -> Result<Matrix> {
        let screen = match self {
            Layout::Configured => return effective_transform(&view.preimage, &view.image),
            Layout::Monzo => Matrix::IDENTITY,
            Layout::Pitch => Matrix::new(1.0, 0.0, val.q_ratio.ln() / val.p_ratio.ln(), 1.0),
            Layout::Hex => Matrix::new(1.0, 0.0, 0.5, 0.866),
        };
        Ok(Matrix::FLIP_Y * screen)
    }
}

pub struct Explorer<S: CommandSink> {
    tuning: TuningConfig,
    last_equal: TuningMode,
    range: NoteRange,
    view: ViewConfig,
    val: Val,
    notes: Vec<Note>,
    basis: BasisEditor,
    clock: Clock,
    pool: VoicePool<S>,
    play_mode: PlayMode,
    selected: Option<Monzo>,
    preimage_index: usize,
    status: String,
}

impl<S: CommandSink> Explorer<S> {
    pub fn new(config: &AppConfig, pool: VoicePool<S>, clock: Clock) -> EyreResult<Self> {
        let val = config
            .tuning
            .generators
            .build(config.tuning.base_freq)
            .wrap_err("invalid tuning in config")?;
        let notes = generate_notes(&val, &config.range).wrap_err("invalid note range in config")?;
        let basis = BasisEditor::new(config.view.preimage, config.view.image, &clock)
            .wrap_err("invalid view handles in config")?;

        let last_equal = match config.tuning.generators {
            TuningMode::JustIntonation { .. } => TuningMode::default(),
            equal => equal,
        };

        info!(%val, notes = notes.len(), "explorer ready");

        let mut explorer = Self {
            tuning: config.tuning.clone(),
            last_equal,
            range: config.range.clone(),
            view: config.view.clone(),
            val,
            notes,
            basis,
            clock,
            pool,
            play_mode: config.play_mode,
            selected: None,
            preimage_index: 0,
            status: String::new(),
        };
        explorer.reselect();
        explorer.status = format!("{}", explorer.val);
        Ok(explorer)
    }

    /// Move the frame clock to `now` seconds.
    pub fn advance_clock(&mut self, now: f64) {
        self.clock.advance_to(now);
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn val(&self) -> &Val {
        &self.val
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn pool(&self) -> &VoicePool<S> {
        &self.pool
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn basis(&self) -> &BasisEditor {
        &self.basis
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selected_note(&self) -> Option<&Note> {
        let monzo = self.selected?;
        self.notes.iter().find(|note| note.monzo() == monzo)
    }

    pub fn is_sounding(&self, note: &Note) -> bool {
        self.pool.is_playing(note)
    }

    /// Lattice → drawing transform at this frame.
    pub fn view_matrix(&self) -> Matrix {
        self.basis.view_transform(&self.clock, self.view.zoom())
    }

    pub fn guides(&self) -> Vec<Guide> {
        guide_lines(&self.val, &self.view_matrix(), GUIDE_COUNT, GUIDE_EXTENT)
    }

    pub fn is_animating(&self) -> bool {
        self.basis.is_animating(&self.clock)
    }

    // ---- selection ----

    /// Step the cursor along the lattice; stays put at the edge of the range.
    pub fn move_selection(&mut self, dm: i32, dn: i32) {
        let Some(current) = self.selected else {
            self.reselect();
            return;
        };
        let target = Monzo::new(current.m + dm, current.n + dn);
        if self.notes.iter().any(|note| note.monzo() == target) {
            self.selected = Some(target);
        }
    }

    /// Step the cursor to the next (or previous) note by frequency.
    pub fn cycle_selection(&mut self, forward: bool) {
        if self.notes.is_empty() {
            return;
        }
        let len = self.notes.len();
        let index = self
            .selected
            .and_then(|monzo| self.notes.iter().position(|note| note.monzo() == monzo));
        let next = match (index, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        self.selected = Some(self.notes[next].monzo());
    }

    fn reselect(&mut self) {
        let keep = self
            .selected
            .filter(|monzo| self.notes.iter().any(|note| note.monzo() == *monzo));
        self.selected = keep.or_else(|| {
            self.notes
                .iter()
                .min_by_key(|note| {
                    let monzo = note.monzo();
                    monzo.m.abs() + monzo.n.abs()
                })
                .map(Note::monzo)
        });
    }

    // ---- playing ----

    /// Sound the selected note. A terminal reports no key releases, so in
    /// hold mode the previous note is let go first.
    pub fn trigger(&mut self) {
        let Some(note) = self.selected_note().cloned() else {
            return;
        };
        if self.play_mode == PlayMode::Hold {
            let released = self.play_mode.release(&mut self.pool);
            self.report(released);
        }
        let pressed = self.play_mode.press(&mut self.pool, &note);
        self.report(pressed);
    }

    /// Pointer pressed at `point` (drawing coordinates, y down).
    pub fn press_at(&mut self, point: Vector) {
        let matrix = self.view_matrix();
        let Some(note) = nearest_note(&self.notes, &matrix, point).cloned() else {
            return;
        };
        self.selected = Some(note.monzo());
        let pressed = self.play_mode.press(&mut self.pool, &note);
        self.report(pressed);
    }

    /// Pointer dragged to `point`; in hold mode the sounding note follows.
    pub fn drag_to(&mut self, point: Vector) {
        let matrix = self.view_matrix();
        let Some(note) = nearest_note(&self.notes, &matrix, point).cloned() else {
            return;
        };
        if self.play_mode != PlayMode::Hold || self.selected == Some(note.monzo()) {
            return;
        }
        self.selected = Some(note.monzo());
        let released = self.play_mode.release(&mut self.pool);
        self.report(released);
        let pressed = self.play_mode.press(&mut self.pool, &note);
        self.report(pressed);
    }

    pub fn release(&mut self) {
        let released = self.play_mode.release(&mut self.pool);
        self.report(released);
    }

    pub fn stop_all(&mut self) {
        let stopped = self.pool.stop_all_notes();
        self.report(stopped);
    }

    pub fn toggle_play_mode(&mut self) {
        let next = self.play_mode.toggled();
        let switched = self.play_mode.switch_to(next, &mut self.pool);
        self.report(switched);
        self.status = format!("play mode: {}", self.play_mode.label());
    }

    // ---- layout ----

    pub fn apply_layout(&mut self, layout: Layout) {
        let applied = layout.transform(&self.val, &self.view).and_then(|transform| {
            let image = Matrix::FLIP_Y * transform * self.basis.preimage();
            self.basis.edit_image(image, Transition::Animate, &self.clock)
        });
        if self.report(applied) {
            self.status = format!("layout: {}", layout.label());
        }
    }

    /// Swap in the next pre-image handle; the layout itself does not move.
    pub fn cycle_preimage(&mut self) {
        self.preimage_index = (self.preimage_index + 1) % PREIMAGES.len();
        let preimage = PREIMAGES[self.preimage_index];
        let edited = self.basis.edit_preimage(preimage);
        if self.report(edited) {
            let m2 = self.basis.image();
            self.status = format!(
                "M1 = [{} {} {} {}]  M2 = [{:.2} {:.2} {:.2} {:.2}]",
                preimage.a, preimage.b, preimage.c, preimage.d, m2.a, m2.b, m2.c, m2.d
            );
        }
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.view.scale = (self.view.scale * factor).clamp(5.0, 1000.0);
    }

    pub fn toggle_guides(&mut self) {
        self.view.show_guides = !self.view.show_guides;
    }

    pub fn toggle_steps(&mut self) {
        self.view.show_steps = !self.view.show_steps;
    }

    // ---- tuning ----

    /// Change the period step count by `delta`, deriving the other count.
    pub fn adjust_p(&mut self, delta: i32) {
        let Some((p, q)) = self.tuning.generators.step_counts() else {
            self.status = "just intonation has no step counts".to_string();
            return;
        };
        let p = p + delta;
        let q = companion_steps(p, self.tuning.reference_p, self.tuning.reference_q).unwrap_or(q);
        self.retune(self.tuning.generators.with_step_counts(p, q));
    }

    /// Change the second generator's step count by `delta`, deriving the period count.
    pub fn adjust_q(&mut self, delta: i32) {
        let Some((p, q)) = self.tuning.generators.step_counts() else {
            self.status = "just intonation has no step counts".to_string();
            return;
        };
        let q = q + delta;
        let p = companion_steps(q, self.tuning.reference_q, self.tuning.reference_p).unwrap_or(p);
        self.retune(self.tuning.generators.with_step_counts(p, q));
    }

    /// Flip between just intonation and the last equal-step tuning.
    pub fn toggle_just_intonation(&mut self) {
        let next = match self.tuning.generators {
            TuningMode::JustIntonation { .. } => self.last_equal,
            equal => {
                self.last_equal = equal;
                TuningMode::JustIntonation {
                    p_ratio: self.tuning.reference_p,
                    q_ratio: self.tuning.reference_q,
                }
            }
        };
        self.retune(next);
    }

    /// Rebuild the val and the note set. On failure nothing changes.
    pub fn retune(&mut self, generators: TuningMode) {
        let rebuilt = generators
            .build(self.tuning.base_freq)
            .and_then(|val| Ok((val, generate_notes(&val, &self.range)?)));
        let (val, notes) = match rebuilt {
            Ok(rebuilt) => rebuilt,
            Err(err) => {
                warn!(%err, ?generators, "retune rejected");
                self.status = err.to_string();
                return;
            }
        };

        // old-tuning voices must be released before their notes go away
        let stopped = self.pool.stop_all_notes();
        if !self.report(stopped) {
            return;
        }

        self.tuning.generators = generators;
        self.val = val;
        self.notes = notes;
        self.reselect();
        self.status = format!("{}", self.val);
        debug!(notes = self.notes.len(), "notes rebuilt");
    }

    /// Surface a failed operation in the status bar. Returns whether it succeeded.
    fn report(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "operation failed");
                self.status = err.to_string();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_tuner::synth::VoiceCommand;
    use rtrb::RingBuffer;

    fn explorer() -> Explorer<Vec<VoiceCommand>> {
        let config = AppConfig::default();
        let pool = VoicePool::new(Vec::new(), config.audio.max_voices);
        Explorer::new(&config, pool, Clock::new()).unwrap()
    }

    #[test]
    fn starts_on_the_base_note() {
        let explorer = explorer();
        let note = explorer.selected_note().unwrap();
        assert_eq!(note.label(), "A4");
        assert_eq!(note.monzo(), Monzo::ORIGIN);
    }

    #[test]
    fn hold_trigger_keeps_one_note() {
        let mut explorer = explorer();
        explorer.trigger();
        explorer.cycle_selection(true);
        explorer.trigger();

        assert_eq!(explorer.pool().active_count(), 1);
        let selected = explorer.selected_note().unwrap().clone();
        assert!(explorer.is_sounding(&selected));

        explorer.release();
        assert_eq!(explorer.pool().active_count(), 0);
    }

    #[test]
    fn toggle_mode_builds_chords() {
        let mut explorer = explorer();
        explorer.toggle_play_mode();
        assert_eq!(explorer.play_mode(), PlayMode::Toggle);

        explorer.trigger();
        explorer.move_selection(-1, 1);
        explorer.trigger();
        assert_eq!(explorer.pool().active_count(), 2);

        explorer.trigger();
        assert_eq!(explorer.pool().active_count(), 1);
    }

    #[test]
    fn selection_stays_inside_the_range() {
        let mut explorer = explorer();
        for _ in 0..20 {
            explorer.move_selection(1, 0);
        }
        let top = explorer.selected_note().unwrap().clone();
        assert!(top.frequency() <= explorer.notes().last().unwrap().frequency());
    }

    #[test]
    fn step_adjustment_derives_companion_and_stops_notes() {
        let mut explorer = explorer();
        explorer.trigger();

        explorer.adjust_p(1);
        assert_eq!(explorer.val().equal_steps.map(|s| (s.p, s.q)), Some((13, 21)));
        assert_eq!(explorer.pool().active_count(), 0);

        explorer.adjust_q(-2);
        assert_eq!(explorer.val().equal_steps.map(|s| (s.p, s.q)), Some((12, 19)));
    }

    #[test]
    fn zero_steps_are_rejected_without_change() {
        let mut explorer = explorer();
        let before = *explorer.val();
        explorer.retune(TuningMode::FromP {
            p: 0,
            q: 19,
            p_ratio: 2.0,
        });
        assert_eq!(*explorer.val(), before);
        assert!(!explorer.status().is_empty());
    }

    #[test]
    fn just_intonation_round_trip() {
        let mut explorer = explorer();
        explorer.toggle_just_intonation();
        assert_eq!(explorer.val().equal_steps, None);
        assert_eq!(explorer.val().q_ratio, 3.0);

        explorer.adjust_p(1);
        assert_eq!(explorer.val().equal_steps, None);

        explorer.toggle_just_intonation();
        assert_eq!(explorer.val().equal_steps.map(|s| (s.p, s.q)), Some((12, 19)));
    }

    #[test]
    fn layouts_animate_then_settle() {
        let mut explorer = explorer();
        explorer.apply_layout(Layout::Monzo);
        assert!(explorer.is_animating());

        explorer.advance_clock(1.0);
        assert!(!explorer.is_animating());
        assert_eq!(explorer.basis().current(explorer.clock()), Matrix::FLIP_Y);
    }

    #[test]
    fn cycling_preimage_keeps_layout() {
        let mut explorer = explorer();
        let before = explorer.basis().transform();
        explorer.cycle_preimage();

        assert_eq!(explorer.basis().preimage(), PREIMAGES[1]);
        let after = explorer.basis().transform();
        assert!((after.a - before.a).abs() < 1e-9);
        assert!((after.d - before.d).abs() < 1e-9);
        assert!(!explorer.is_animating());
    }

    #[test]
    fn pointer_press_picks_nearest_note() {
        let mut explorer = explorer();
        explorer.cycle_selection(true);
        explorer.press_at(Vector::new(3.0, -2.0));

        let note = explorer.selected_note().unwrap();
        assert_eq!(note.monzo(), Monzo::ORIGIN);
        assert!(explorer.pool().is_playing(note));
    }

    #[test]
    fn pitch_layout_with_unison_period_keeps_the_view() {
        let mut config = AppConfig::default();
        config.tuning.generators = TuningMode::FromS {
            p: 0,
            q: 12,
            unit: 2f64.powf(1.0 / 12.0),
        };
        let pool = VoicePool::new(Vec::new(), config.audio.max_voices);
        let mut explorer = Explorer::new(&config, pool, Clock::new()).unwrap();
        let before = explorer.basis().transform();

        explorer.apply_layout(Layout::Pitch);

        assert_eq!(explorer.basis().transform(), before);
        assert!(explorer.view_matrix().is_finite());
        assert!(!explorer.status().starts_with("layout"));
    }

    #[test]
    fn retune_waits_for_the_stop_to_be_queued() {
        let config = AppConfig::default();
        // a hold trigger queues a release-all and a start, each with a master level
        let (producer, _consumer) = RingBuffer::<VoiceCommand>::new(4);
        let pool = VoicePool::new(producer, config.audio.max_voices);
        let mut explorer = Explorer::new(&config, pool, Clock::new()).unwrap();
        let val = *explorer.val();
        let note_count = explorer.notes().len();

        explorer.trigger();
        assert_eq!(explorer.pool().active_count(), 1);

        explorer.adjust_p(1);

        assert_eq!(*explorer.val(), val);
        assert_eq!(explorer.notes().len(), note_count);
        assert_eq!(explorer.pool().active_count(), 1);
        let selected = explorer.selected_note().unwrap().clone();
        assert!(explorer.is_sounding(&selected));
        assert_eq!(
            explorer.status(),
            lattice_tuner::LatticeError::CommandQueueFull.to_string()
        );
    }
}
