//! subpix-edges CLI: subpixel edge detection on image files.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{info, warn, LevelFilter};
use subpix_edges::detect::detect_edges_dynamic;
use subpix_edges::io::{write_edge_map, DetectConfig, EdgeReport};
use subpix_edges::{CannyZernikeParams, Denoise, Roi};

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "subpix-edges")]
#[command(about = "Detect edges with subpixel precision (four-direction Canny + Zernike moments)")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect edges in an image and write a JSON report.
    Detect(DetectArgs),

    /// Print (or write) a default JSON config.
    DefaultConfig {
        /// Write the config here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the input image. Overrides `image_path` from --config.
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON config to start from.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the JSON report (default: edge_report.json).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to write the binary edge map as an image.
    #[arg(long)]
    edges: Option<PathBuf>,

    /// Low threshold, either a ratio (<= 1) or a 0-255 intensity.
    #[arg(long, requires = "high")]
    low: Option<f32>,

    /// High threshold, either a ratio (<= 1) or a 0-255 intensity.
    #[arg(long, requires = "low")]
    high: Option<f32>,

    /// Skip the Zernike subpixel pass.
    #[arg(long)]
    no_subpixel: bool,

    /// Preprocessing filter.
    #[arg(long, value_enum)]
    denoise: Option<DenoiseArg>,

    /// Region of interest as x,y,width,height.
    #[arg(long)]
    roi: Option<Roi>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DenoiseArg {
    Bilateral,
    Gaussian,
    None,
}

impl From<DenoiseArg> for Denoise {
    fn from(arg: DenoiseArg) -> Self {
        match arg {
            DenoiseArg::Bilateral => Denoise::bilateral(),
            DenoiseArg::Gaussian => Denoise::gaussian(),
            DenoiseArg::None => Denoise::None,
        }
    }
}

impl DetectArgs {
    /// Merge command-line overrides into the (optional) config file.
    fn to_config(&self) -> CliResult<DetectConfig> {
        let mut cfg = match &self.config {
            Some(path) => DetectConfig::load_json(path)?,
            None => DetectConfig::default(),
        };
        if let Some(image) = &self.image {
            cfg.image_path = image.to_string_lossy().into_owned();
        }
        if cfg.image_path.is_empty() {
            return Err("no input image; pass --image or set image_path in --config".into());
        }
        if let Some(out) = &self.out {
            cfg.output_path = Some(out.to_string_lossy().into_owned());
        }
        if let Some(edges) = &self.edges {
            cfg.edges_path = Some(edges.to_string_lossy().into_owned());
        }

        let opts = &mut cfg.options;
        if let (Some(low), Some(high)) = (self.low, self.high) {
            let apply_subpixel = opts.params.apply_subpixel;
            opts.params =
                CannyZernikeParams::from_thresholds(low, high).with_subpixel(apply_subpixel);
        }
        if self.no_subpixel {
            opts.params.apply_subpixel = false;
        }
        if let Some(denoise) = self.denoise {
            opts.denoise = denoise.into();
        }
        if let Some(roi) = self.roi {
            opts.roi = Some(roi);
        }
        opts.params.validate()?;
        Ok(cfg)
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::DefaultConfig { out } => run_default_config(out.as_deref()),
    }
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8) -> CliResult<()> {
    subpix_edges::core::init_with_level(level_for(verbose))
        .map_err(|e| -> CliError { format!("failed to install logger: {e}").into() })
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: u8) -> CliResult<()> {
    let level = level_for(verbose);
    let _ = LogTracer::init_with_filter(level);
    subpix_edges::core::init_tracing(level);
    Ok(())
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(args)))]
fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let cfg = args.to_config()?;
    let image_path = PathBuf::from(&cfg.image_path);
    info!("loading image: {}", image_path.display());

    let img = image::open(&image_path).map_err(|e| -> CliError {
        format!("failed to open image {}: {}", image_path.display(), e).into()
    })?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    info!("image size: {}x{}", width, height);

    let mut report = EdgeReport::new(&cfg, width, height);
    match detect_edges_dynamic(&img, &cfg.options) {
        Ok(result) => {
            info!("detected {} edge pixels", result.edge_map.count());
            if let Some(stats) = &result.refine_stats {
                info!(
                    "subpixel: {} refined, {} kept at integer coordinates",
                    stats.refined,
                    stats.fallbacks()
                );
            }
            if let Some(edges_path) = &cfg.edges_path {
                write_edge_map(&result.edge_map, edges_path)?;
                info!("edge map written to {}", edges_path);
            }
            report.set_detection(result);
        }
        Err(err) => {
            warn!("detection failed: {err}");
            report.set_error(&err);
        }
    }

    let out = cfg.output_path();
    report.write_json(&out)?;
    println!("wrote edge report to {}", out.display());

    match report.error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn run_default_config(out: Option<&Path>) -> CliResult<()> {
    let cfg = DetectConfig {
        image_path: "image.png".to_string(),
        output_path: Some("edge_report.json".to_string()),
        edges_path: Some("edges.png".to_string()),
        ..DetectConfig::default()
    };
    match out {
        Some(path) => {
            cfg.write_json(path)?;
            println!("wrote default config to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&cfg)?),
    }
    Ok(())
}
