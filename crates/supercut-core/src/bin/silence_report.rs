//! Silence report - print the silent regions of a waveform peaks file
//!
//! Usage: `silence-report <peaks.json> <duration-seconds> [threshold-db] [min-silence-seconds]`
//!
//! Detection settings default to the user's editor config; the optional
//! arguments override them. Set RUST_LOG=debug for verbose output.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use supercut_core::config::{default_config_path, load_config, EditorConfig, CONFIG_FILENAME};
use supercut_core::peaks::WaveformPeaks;
use supercut_core::silence::SilenceSession;
use supercut_core::timecode::to_timecode;

fn parse_number(args: &[String], index: usize, name: &str) -> Result<Option<f64>> {
    args.get(index)
        .map(|raw| {
            raw.parse::<f64>()
                .with_context(|| format!("{} must be a number, got {:?}", name, raw))
        })
        .transpose()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        bail!("usage: silence-report <peaks.json> <duration-seconds> [threshold-db] [min-silence-seconds]");
    }

    let peaks_path = PathBuf::from(&args[0]);
    let duration = parse_number(&args, 1, "duration")?.unwrap_or_default();
    if !(duration.is_finite() && duration > 0.0) {
        bail!("duration must be positive, got {}", duration);
    }

    let config: EditorConfig = load_config(&default_config_path(CONFIG_FILENAME));
    let frame_rate = config.timecode.frame_rate();
    let mut session = SilenceSession::new(config.silence.clone());
    if let Some(db) = parse_number(&args, 2, "threshold-db")? {
        session.set_threshold_db(db);
    }
    if let Some(seconds) = parse_number(&args, 3, "min-silence-seconds")? {
        session.set_min_silence_duration(seconds);
    }

    let json = std::fs::read_to_string(&peaks_path)
        .with_context(|| format!("Failed to read peaks file: {:?}", peaks_path))?;
    let peaks = WaveformPeaks::from_json(&json)
        .with_context(|| format!("Failed to decode peaks file: {:?}", peaks_path))?;

    let params = session.params();
    log::info!(
        "silence-report: {} samples over {:.3}s, threshold {} dB, min {}s",
        peaks.len(),
        duration,
        params.threshold_db,
        params.min_silence_duration
    );

    let regions = supercut_core::silence::detect_silence(peaks.samples(), duration, &params);
    if regions.is_empty() {
        println!("No silent regions found with the current settings.");
        return Ok(());
    }

    println!("{:>4}  {:<11}  {:<11}  {:>9}", "#", "In", "Out", "Seconds");
    let mut total = 0.0;
    for (i, region) in regions.iter().enumerate() {
        total += region.duration();
        println!(
            "{:>4}  {}  {}  {:>9.3}",
            i + 1,
            to_timecode(region.start(), frame_rate),
            to_timecode(region.end(), frame_rate),
            region.duration()
        );
    }
    println!();
    println!(
        "{} regions, {:.3}s silent ({:.1}% of {:.3}s at {} fps)",
        regions.len(),
        total,
        total / duration * 100.0,
        duration,
        frame_rate
    );
    Ok(())
}
