//! ttsprep CLI: turn forced-alignment exports into TTS training records.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use ttsprep_core::PrepConfig;
use ttsprep_core::corpus::pipeline::prepare;
use ttsprep_core::export::{JsonlSink, export};
use ttsprep_core::types::Partition;

// ─── Arguments ───────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "ttsprep",
    about = "Correct alignment boundaries and build frame-aligned TTS training records",
    version,
)]
struct Args {
    /// File with alignments (source|start|end|text|phonemes|durations)
    #[arg(long)]
    input_file: PathBuf,

    /// Output directory for train/dev partitions and the manifest
    #[arg(long, default_value = "data/processed")]
    output_dir: PathBuf,

    /// How many previous sentences to use for context
    #[arg(long, default_value_t = 5)]
    prev_sentences: usize,

    /// How many following sentences to use for context
    #[arg(long, default_value_t = 5)]
    next_sentences: usize,

    /// Ratio between dev and train
    #[arg(long, default_value_t = 0.001)]
    dev_ratio: f64,

    /// Label to use for the speaker
    #[arg(long, default_value = "none")]
    speaker: String,

    /// Sample rate of the feature extractor (Hz)
    #[arg(long, default_value_t = PrepConfig::DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// Frame analysis hop size (samples)
    #[arg(long, default_value_t = PrepConfig::DEFAULT_HOP_SIZE)]
    hop_size: u32,

    /// Prefix for record ids
    #[arg(long, default_value = "FILE")]
    prefix: String,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> PrepConfig {
        PrepConfig {
            prev_sentences: self.prev_sentences,
            next_sentences: self.next_sentences,
            dev_ratio: self.dev_ratio,
            speaker: self.speaker.clone(),
            sample_rate: self.sample_rate,
            hop_size: self.hop_size,
            prefix: self.prefix.clone(),
        }
    }
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn validate_input(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("File not found: {}", path.display());
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    validate_input(&args.input_file)?;
    let config = args.config();

    log::info!("Reading alignments: {}", args.input_file.display());
    let content = std::fs::read_to_string(&args.input_file)
        .with_context(|| format!("Failed to read {}", args.input_file.display()))?;

    let corpus = prepare(content.lines(), &config)
        .with_context(|| format!("Failed to prepare {}", args.input_file.display()))?;

    let mut sink = JsonlSink::new(&args.output_dir);
    let manifest = export(&corpus, &mut sink, &args.input_file, &config, &args.output_dir)?;

    println!(
        "Prepared {} utterances ({} skipped lines)",
        manifest.stats.utterances, manifest.stats.lines_skipped
    );
    println!("Train: {}", sink.partition_path(Partition::Train).display());
    println!("Dev: {}", sink.partition_path(Partition::Dev).display());
    println!("Manifest: {}", args.output_dir.join("manifest.json").display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_match_config_defaults() {
        let args = Args::parse_from(["ttsprep", "--input-file", "align.txt"]);
        assert_eq!(args.config(), PrepConfig::default());
        assert_eq!(args.output_dir, PathBuf::from("data/processed"));
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_override() {
        let args = Args::parse_from([
            "ttsprep",
            "--input-file",
            "align.txt",
            "--dev-ratio",
            "0.01",
            "--speaker",
            "narrator",
            "--prev-sentences",
            "2",
            "-v",
        ]);
        let config = args.config();
        assert!((config.dev_ratio - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.speaker, "narrator");
        assert_eq!(config.prev_sentences, 2);
        assert_eq!(config.next_sentences, 5);
        assert!(args.verbose);
    }

    #[test]
    fn test_missing_input_rejected() {
        assert!(validate_input(Path::new("/nonexistent/align.txt")).is_err());
    }
}
