use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use palette_swap::{
    ColorMapping, DEFAULT_MAX_COLORS, DEFAULT_REFERENCE_PALETTE, DEFAULT_SEED, DEFAULT_TOLERANCE,
    ExtractMode, ExtractOptions, PixelBuffer, get_unique_colors_bytes, parse_palette,
    replace_colors,
};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Extract or replace the colors of an image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the image's colors as JSON
    Extract {
        /// Input image path
        input: PathBuf,

        /// Maximum number of dominant colors
        #[arg(short = 'k', long, default_value_t = DEFAULT_MAX_COLORS)]
        max_colors: usize,

        /// List every distinct color instead of clustering
        #[arg(long)]
        exact: bool,

        /// Comma-separated list of hex colors to snap to
        #[arg(short = 'c', long, conflicts_with = "default_palette")]
        palette: Option<String>,

        /// Use the built-in ten-color reference palette
        #[arg(long)]
        default_palette: bool,

        /// Seed for k-means initialisation
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Replace colors and write a PNG
    Replace {
        /// Input image path
        input: PathBuf,

        /// JSON object of target to replacement hex colors
        #[arg(short, long)]
        map: String,

        /// Euclidean RGB distance below which a pixel matches a target
        #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,

        /// Output PNG path
        #[arg(short, long, required_unless_present = "base64")]
        output: Option<PathBuf>,

        /// Print `{"modified_image": <base64 PNG>}` instead of writing a file
        #[arg(long, conflicts_with = "output")]
        base64: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "palette_swap=debug"
    } else {
        "palette_swap=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match args.command {
        Command::Extract {
            input,
            max_colors,
            exact,
            palette,
            default_palette,
            seed,
        } => {
            let reference = match (palette, default_palette) {
                (Some(list), _) => Some(parse_palette(&list).context("invalid --palette")?),
                (None, true) => Some(DEFAULT_REFERENCE_PALETTE.to_vec()),
                (None, false) => None,
            };
            let options = ExtractOptions {
                mode: if exact {
                    ExtractMode::Exact
                } else {
                    ExtractMode::Clustering
                },
                max_colors,
                reference,
                seed,
            };

            let bytes = fs::read(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let colors =
                get_unique_colors_bytes(&bytes, &options).context("color extraction failed")?;
            println!("{}", json!({ "unique_colors": colors }));
        }
        Command::Replace {
            input,
            map,
            tolerance,
            output,
            base64,
        } => {
            let mapping = ColorMapping::from_json(&map).context("invalid --map")?;
            let bytes = fs::read(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let buffer = PixelBuffer::from_bytes(&bytes).context("failed to decode image")?;
            let modified =
                replace_colors(buffer, &mapping, tolerance).context("color replacement failed")?;

            if base64 {
                let encoded = modified.to_png_base64()?;
                println!("{}", json!({ "modified_image": encoded }));
            } else {
                let Some(out_path) = output else {
                    bail!("either --output or --base64 is required");
                };
                if let Some(parent) = out_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&out_path, modified.to_png()?)?;
                eprintln!("Saved → {}", out_path.display());
            }
        }
    }

    Ok(())
}
