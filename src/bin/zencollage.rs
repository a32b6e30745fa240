// zencollage: lay out images in balanced rows and write a JPEG collage
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use zencollage::query::{self, ParseWarning};
use zencollage::svg::render_collage_svg;
use zencollage::{CollageConfig, CollageError, ImageCrateCodec, build_collage};

#[derive(Parser)]
#[clap(author, version, about = "Build a balanced-row collage from images")]
struct Args {
    /// Input images, in collage order
    #[clap(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Output JPEG path
    #[clap(short, long, default_value = "collage.jpg")]
    output: PathBuf,

    /// Query string with collage settings, e.g. "w=1024&h=320&bg=white"
    #[clap(long)]
    query: Option<String>,

    /// Maximum output width (overrides --query)
    #[clap(long)]
    max_width: Option<u32>,

    /// Maximum output height (overrides --query)
    #[clap(long)]
    max_height: Option<u32>,

    /// Height every image is normalized to before layout (overrides --query)
    #[clap(long)]
    height: Option<u32>,

    /// Background color, hex or CSS3 name (overrides --query)
    #[clap(long)]
    background: Option<String>,

    /// JPEG quality 1-100 (overrides --query)
    #[clap(long)]
    quality: Option<u8>,

    /// Also write an SVG diagram of the layout
    #[clap(long, value_name = "SVG_FILE")]
    svg: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(args.verbose) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            // Bad input is distinguished from internal failures.
            let input = e
                .downcast_ref::<CollageError>()
                .is_some_and(CollageError::is_input_error);
            ExitCode::from(if input { 2 } else { 1 })
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;

    let images = args
        .images
        .iter()
        .map(|path| fs::read(path).with_context(|| format!("Failed to read {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let collage = build_collage(&ImageCrateCodec::new(), &images, &config)?;

    fs::write(&args.output, &collage.encoded)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    if let Some(svg_path) = &args.svg {
        fs::write(svg_path, render_collage_svg(&collage.plan))
            .with_context(|| format!("Failed to write {}", svg_path.display()))?;
    }

    info!(
        "Collage created in {:.3} seconds ({}x{}, {} images) -> {}",
        collage.elapsed.as_secs_f64(),
        collage.output.width,
        collage.output.height,
        images.len(),
        args.output.display()
    );
    Ok(())
}

fn build_config(args: &Args) -> Result<CollageConfig> {
    let mut config = CollageConfig::new();

    if let Some(q) = &args.query {
        let parsed = query::parse(q);
        for w in &parsed.warnings {
            match w {
                ParseWarning::DuplicateKey { key, value } => {
                    warn!("duplicate query key {key}, using {value:?}")
                }
                ParseWarning::KeyNotRecognized { key, .. } => {
                    warn!("ignoring unknown query key {key}")
                }
                ParseWarning::ValueInvalid { key, value, reason } => {
                    warn!("ignoring {key}={value:?}: {reason}")
                }
            }
        }
        config = parsed.options.apply(config);
    }

    if let Some(h) = args.height {
        config = config.normalize_height(h);
    }
    if let Some(w) = args.max_width {
        config.max_output.width = w;
    }
    if let Some(h) = args.max_height {
        config.max_output.height = h;
    }
    if let Some(bg) = &args.background {
        let color = query::parse_color(bg).with_context(|| format!("Invalid background color {bg:?}"))?;
        config = config.background(color);
    }
    if let Some(q) = args.quality {
        config = config.jpeg_quality(q);
    }

    Ok(config)
}
