//! TonePress command-line driver
//!
//! Loads a stereo file, analyzes it, resolves a preset (metrics-driven
//! "Auto" or a fixed genre preset), runs the mastering chain and exports
//! a float WAV.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tp_master::{AudioAnalyzer, AutoPresetEngine, GenrePreset, MasteringChain, MasteringSettings};

#[derive(Parser, Debug)]
#[command(name = "tonepress", about = "Offline mastering processor", version)]
struct Args {
    /// Input audio file (WAV or MP3)
    input: PathBuf,

    /// Output WAV path
    #[arg(short, long)]
    output: PathBuf,

    /// Preset name: Auto, Pop, Hip-Hop, EDM, Rock, Acoustic
    #[arg(short, long, default_value = "Auto")]
    preset: String,

    /// Auto-preset strength in [0.5, 2.0]
    #[arg(short, long, default_value_t = 1.0)]
    strength: f64,

    /// Start from a settings JSON file instead of defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print the analysis report as JSON
    #[arg(long)]
    report: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let preset = match GenrePreset::by_name(&args.preset) {
        Some(p) => p,
        None => {
            let names: Vec<&str> = GenrePreset::all().iter().map(|p| p.name()).collect();
            bail!("unknown preset '{}' (expected one of {})", args.preset, names.join(", "));
        }
    };
    eprintln!("preset: {} - {}", preset.name(), preset.description());

    let input = tp_file::load_audio(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    eprintln!(
        "{}: {:.1}s at {} Hz",
        args.input.display(),
        input.duration_secs(),
        input.sample_rate()
    );

    let metrics = AudioAnalyzer::new().analyze(&input);
    eprintln!(
        "analysis: {:.1} LUFS, {:.1} dBTP, crest {:.1} dB",
        metrics.integrated_lufs, metrics.true_peak_dbtp, metrics.crest_factor_db
    );
    if args.report {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    }

    let mut settings = match &args.settings {
        Some(path) => tp_file::load_settings(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => MasteringSettings::default(),
    };

    if preset.is_auto() {
        let snapshot = AutoPresetEngine::derive(&metrics, args.strength);
        snapshot.apply_to(&mut settings);
        log::info!(
            "auto preset: target {} LUFS, ceiling {:.1} dBTP",
            snapshot.target_lufs,
            snapshot.limiter_ceiling_db_tp
        );
    } else {
        preset.apply(&mut settings);
        log::info!("applied preset '{}'", preset.name());
    }

    let chain = MasteringChain::new(settings);
    let output = chain.process_with_progress(&input, |percent, message| {
        eprint!("\r[{percent:5.1}%] {message:<40}");
        let _ = std::io::stderr().flush();
    });
    eprintln!();

    tp_file::write_wav_float(&args.output, &output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    eprintln!("done: {}", args.output.display());

    Ok(())
}
