//! quale CLI - no-reference video quality estimation from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use quale::{
    predict_quality, predict_quality_hybrid, DeviceType, HybridOptions, HybridStrategy,
    ModelCoefficients, ModelVariant, PredictOptions, Report, ReportingScale, Resolution,
    VideoCodec, ViewingDistance,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    /// Normal output with progress bar.
    Normal,
    /// JSON output for programmatic parsing.
    Json,
    /// Quiet mode with minimal output.
    Quiet,
}

/// Model variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    /// Stream metadata only (bitrate, resolution, framerate).
    Coarse,
    /// Adds per-frame size statistics (slower probe, better estimate).
    Refined,
}

impl From<VariantArg> for ModelVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Coarse => ModelVariant::Coarse,
            VariantArg::Refined => ModelVariant::Refined,
        }
    }
}

/// Reporting granularity selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum ScaleArg {
    /// Full 5-point scale.
    #[default]
    Five,
    /// Coarser 4.5-capped scale.
    FourFive,
}

impl From<ScaleArg> for ReportingScale {
    fn from(s: ScaleArg) -> Self {
        match s {
            ScaleArg::Five => ReportingScale::Five,
            ScaleArg::FourFive => ReportingScale::FourFive,
        }
    }
}

/// Hybrid re-encode strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum StrategyArg {
    /// Re-encode with the source codec; no score correction.
    SameCodec,
    /// Re-encode with HEVC and correct for the round trip.
    #[default]
    Hevc,
}

impl From<StrategyArg> for HybridStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::SameCodec => HybridStrategy::SameCodec,
            StrategyArg::Hevc => HybridStrategy::Hevc,
        }
    }
}

/// Arguments shared by both subcommands.
#[derive(Debug, clap::Args)]
struct CommonArgs {
    /// Input videos to estimate quality for.
    #[arg(required = true)]
    videos: Vec<PathBuf>,

    /// Model coefficient document (JSON); defaults to the built-in one.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Model variant.
    #[arg(long, value_enum, default_value = "coarse")]
    variant: VariantArg,

    /// Device used for playout (pc, tv, tablet, mobile).
    #[arg(long, default_value = "pc")]
    device_type: String,

    /// Resolution of the output device (width x height).
    #[arg(long, default_value = "3840x2160")]
    device_resolution: String,

    /// Viewing distance relative to the display height.
    #[arg(long, default_value = "1.5xH")]
    viewing_distance: String,

    /// Display diagonal size in inches.
    #[arg(long, default_value = "55")]
    display_size: f64,

    /// Reporting granularity of the final scores.
    #[arg(long, value_enum, default_value = "five")]
    scale: ScaleArg,

    /// Folder for cached features and other intermediate results.
    #[arg(long, default_value = "tmp")]
    tmp: PathBuf,

    /// Disable the feature cache.
    #[arg(long)]
    no_cache: bool,

    /// Folder to store per-video quality reports.
    #[arg(long, default_value = "reports")]
    result_folder: PathBuf,

    /// Number of parallel prediction jobs (default: available cores).
    #[arg(long)]
    jobs: Option<usize>,

    /// JSON output mode for programmatic parsing.
    #[arg(long, conflicts_with = "quiet")]
    json: bool,

    /// Print nothing except errors.
    #[arg(short, long, conflicts_with = "debug")]
    quiet: bool,

    /// Show debug output.
    #[arg(short, long)]
    debug: bool,
}

impl CommonArgs {
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }

    fn predict_options(&self) -> anyhow::Result<PredictOptions> {
        let coefficients = match &self.model {
            Some(path) => ModelCoefficients::from_file(path)?,
            None => ModelCoefficients::builtin(),
        };

        let mut options = PredictOptions::new()
            .variant(self.variant.into())
            .device_type(DeviceType::parse(&self.device_type)?)
            .device_resolution(Resolution::parse(&self.device_resolution)?)
            .viewing_distance(ViewingDistance::parse(&self.viewing_distance)?)
            .display_size(self.display_size)
            .reporting(self.scale.into())
            .coefficients(coefficients);
        if !self.no_cache {
            options = options.cache_dir(&self.tmp);
        }
        Ok(options)
    }
}

/// Hybrid-mode arguments.
#[derive(Debug, clap::Args)]
struct HybridArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Bitrate to re-encode with, ffmpeg style (e.g. 100k, 5M).
    #[arg(short = 'b', long)]
    bitrate: String,

    /// Width to re-encode with.
    #[arg(long)]
    width: u32,

    /// Height to re-encode with.
    #[arg(long)]
    height: u32,

    /// Framerate to re-encode with.
    #[arg(long)]
    framerate: f64,

    /// Source codec (selects the re-encode target for same-codec, the
    /// score correction for hevc).
    #[arg(long)]
    codec: Option<String>,

    /// Re-encode strategy.
    #[arg(long, value_enum, default_value = "hevc")]
    strategy: StrategyArg,

    /// Folder for re-encoded probe videos.
    #[arg(long, default_value = "tmp_reencoded")]
    tmp_reencoded: PathBuf,

    /// Keep re-encoded probe videos for later runs.
    #[arg(long)]
    keep_reencodes: bool,
}

impl HybridArgs {
    fn hybrid_options(&self) -> HybridOptions {
        HybridOptions {
            source_codec: self.codec.as_deref().map(VideoCodec::parse),
            strategy: self.strategy.into(),
            bitrate: self.bitrate.clone(),
            width: self.width,
            height: self.height,
            framerate: self.framerate,
            reencode_dir: self.tmp_reencoded.clone(),
            keep_reencodes: self.keep_reencodes,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "quale")]
#[command(version)]
#[command(about = "No-reference video quality estimation from compressed-domain statistics")]
#[command(long_about = "quale predicts a MOS-like quality score (1-5) per video and per \n\
    second of playback from container metadata and frame-size statistics, \n\
    without reference to the uncompressed source.\n\n\
    EXAMPLES:\n    \
    quale predict clip.mp4\n    \
    quale predict --variant refined --device-type mobile *.mp4\n    \
    quale hybrid clip.mp4 -b 100k --width 1024 --height 576 --framerate 30 --codec h264")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict quality from the bitstream alone.
    Predict(CommonArgs),
    /// Re-encode at controlled settings, predict, and correct the scores.
    Hybrid(HybridArgs),
}

/// Outcome of one video's prediction.
struct VideoOutcome {
    video: PathBuf,
    result: anyhow::Result<Report>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let common = match &cli.command {
        Command::Predict(args) => args,
        Command::Hybrid(args) => &args.common,
    };
    let output_mode = common.output_mode();

    if output_mode != OutputMode::Json {
        let level = if common.debug {
            tracing::Level::DEBUG
        } else if common.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::INFO
        };
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    let options = common.predict_options()?;
    info!(
        "handling {} video(s) with the {} variant",
        common.videos.len(),
        options.variant
    );

    let progress = match output_mode {
        OutputMode::Normal => {
            let pb = ProgressBar::new(common.videos.len() as u64);
            pb.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(pb)
        }
        _ => None,
    };

    let outcomes = run_batch(&cli, &options, progress.as_ref())?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    std::fs::create_dir_all(&common.result_folder)?;
    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(report) => {
                write_report(&common.result_folder, &report)?;
                reports.push(report);
            }
            Err(e) => failures.push((outcome.video, e)),
        }
    }

    match output_mode {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputMode::Quiet => {}
        OutputMode::Normal => print_summary(&reports, &failures, &common.result_folder),
    }

    for (video, error) in &failures {
        eprintln!(
            "{} {}: {error:#}",
            style("failed:").red().bold(),
            video.display()
        );
    }
    if !failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_batch(
    cli: &Cli,
    options: &PredictOptions,
    progress: Option<&ProgressBar>,
) -> anyhow::Result<Vec<VideoOutcome>> {
    let (common, hybrid) = match &cli.command {
        Command::Predict(args) => (args, None),
        Command::Hybrid(args) => (&args.common, Some(args)),
    };

    let jobs = common
        .jobs
        .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let predict_one = |video: &PathBuf| -> VideoOutcome {
        let result = match hybrid {
            None => predict_quality(video, options).map_err(anyhow::Error::from),
            Some(args) => {
                predict_quality_hybrid(video, options, args.hybrid_options())
                    .map_err(anyhow::Error::from)
            }
        };
        if let Some(pb) = progress {
            pb.inc(1);
            pb.set_message(video.display().to_string());
        }
        VideoOutcome {
            video: video.clone(),
            result,
        }
    };

    use rayon::prelude::*;
    Ok(pool.install(|| common.videos.par_iter().map(predict_one).collect()))
}

fn write_report(folder: &Path, report: &Report) -> anyhow::Result<()> {
    let stem = Path::new(&report.video_basename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.video_basename.clone());
    let path = folder.join(format!("{stem}.json"));
    std::fs::write(&path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

fn print_summary(reports: &[Report], failures: &[(PathBuf, anyhow::Error)], folder: &Path) {
    println!();
    println!("{}", style("Quality Reports").cyan().bold());
    for report in reports {
        println!(
            "  {:<40} {}  ({} s)",
            report.video_basename,
            style(format!("{:.3}", report.per_sequence)).green().bold(),
            report.per_second.len(),
        );
    }
    if !failures.is_empty() {
        println!("  {} video(s) failed", style(failures.len()).red());
    }
    println!();
    println!("  Reports written to {}", style(folder.display()).white());
}
