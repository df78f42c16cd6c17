//! lattice - terminal explorer for two-generator tunings
//!
//! Run with: cargo run --bin lattice -- --config lattice.toml

mod app;
mod config;
mod explorer;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lattice_tuner::{geometry::Clock, lattice::generate_notes};

use app::AudioOutput;
use config::AppConfig;
use explorer::Explorer;
use ui::UiApp;

#[derive(Parser, Debug)]
#[command(name = "lattice", about = "Play and lay out notes of a two-generator tuning")]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = "lattice.toml")]
    config: String,

    /// Where log output goes while the terminal UI owns the screen
    #[arg(long, default_value = "lattice.log")]
    log_file: String,

    /// Print the generated note table and exit
    #[arg(long)]
    list: bool,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let log = File::create(&args.log_file)
        .wrap_err_with(|| format!("failed to create log file {}", args.log_file))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    let config = AppConfig::load_or_default(&args.config);

    if args.list {
        return print_notes(&config);
    }

    let AudioOutput {
        stream,
        sample_rate,
        channels,
        pool,
        samples,
        status,
    } = app::start_audio(&config.audio)?;
    info!(channels, "audio running");

    let explorer = Explorer::new(&config, pool, Clock::new())?;
    let mut ui = UiApp::new(
        explorer,
        samples,
        status,
        sample_rate,
        config.audio.limiter.ceiling,
    );

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;
    let result = ui.run(&mut terminal);
    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();

    drop(stream);
    result
}

fn print_notes(config: &AppConfig) -> EyreResult<()> {
    let val = config
        .tuning
        .generators
        .build(config.tuning.base_freq)
        .wrap_err("invalid tuning")?;
    let notes = generate_notes(&val, &config.range).wrap_err("invalid note range")?;

    println!("{val}");
    println!("{:<8} {:>12} {:>7} {:>12}", "note", "monzo", "steps", "Hz");
    for note in &notes {
        let steps = note.steps().map_or_else(|| "-".to_string(), |s| s.to_string());
        println!(
            "{:<8} {:>12} {:>7} {:>12.3}",
            note.label(),
            note.monzo().to_string(),
            steps,
            note.frequency()
        );
    }
    println!("{} notes", notes.len());
    Ok(())
}
