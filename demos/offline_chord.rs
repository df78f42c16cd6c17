//! Renders a just major triad through the voice pool without an audio device
//! and prints the level of each quarter second.

use lattice_tuner::{
    dsp::{
        amplify::{amp_to_db, peak, rms},
        LimiterParams,
    },
    lattice::{generate_notes, NoteRange},
    synth::{voice_channel, VoiceConfig},
    tuning::Val,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn main() -> lattice_tuner::Result<()> {
    let val = Val::just_intonation(2.0, 3.0, 261.63)?;
    let range = NoteRange {
        base: "C4".into(),
        min: "C4".into(),
        max: "C5".into(),
        ..NoteRange::default()
    };
    let notes = generate_notes(&val, &range)?;

    let (mut pool, mut engine) = voice_channel(
        SAMPLE_RATE,
        8,
        64,
        VoiceConfig::default(),
        LimiterParams::default(),
    );

    println!("{val}");
    for label in ["C4", "E4", "G4"] {
        if let Some(note) = notes.iter().find(|n| n.label() == label) {
            println!("  {:<4} {}  {:.2} Hz", label, note.monzo(), note.frequency());
            pool.play_note(note)?;
        }
    }

    let quarter = (SAMPLE_RATE / 4.0) as usize;
    let mut block = vec![0.0f32; quarter];
    for i in 0..8 {
        if i == 6 {
            pool.stop_all_notes()?;
        }
        engine.render_block(&mut block);
        println!(
            "{:>5.2}s  voices {}  peak {:>6.1} dB  rms {:>6.1} dB",
            (i + 1) as f32 * 0.25,
            engine.sounding_voices(),
            amp_to_db(peak(&block)),
            amp_to_db(rms(&block)),
        );
    }

    Ok(())
}
