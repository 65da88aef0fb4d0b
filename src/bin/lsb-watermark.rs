use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;

use lsb_watermark::{
    default_output_path, embed_file, extract_file, is_supported_image, Method, ProcessOptions,
    WatermarkSource,
};

#[derive(Parser)]
#[command(
    name = "lsb-watermark",
    about = "Embed and extract binary watermarks in the least-significant bit plane of images",
    version,
    after_help = "Methods: direct, bitwise-add, negated-bitwise-add\n\n\
                  NOTE: Extraction needs the original carrier, the same method, and the\n\
                  watermark's original size. Save watermarked images as PNG, BMP or TIFF;\n\
                  lossy formats destroy the watermark."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Hide a watermark in a carrier image
    Embed {
        /// Carrier image
        carrier: PathBuf,

        /// Watermark image (binarized before embedding)
        watermark: PathBuf,

        /// Output file (default: the carrier's name with a "watermarked" suffix, as PNG)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Embedding method
        #[arg(short, long, default_value = "direct")]
        method: Method,

        /// Watermark binarization threshold (0-255)
        #[arg(short, long, default_value = "127")]
        threshold: u8,
    },

    /// Recover a watermark using the original carrier
    Extract {
        /// Watermarked image
        watermarked: PathBuf,

        /// Original carrier image
        carrier: PathBuf,

        /// Original watermark file (only its size is used)
        #[arg(short, long, conflicts_with = "size", required_unless_present = "size")]
        watermark: Option<PathBuf>,

        /// Original watermark size, e.g. 64x32
        #[arg(short, long, value_parser = parse_size)]
        size: Option<(u32, u32)>,

        /// Output file (default: the input's name with an "extracted" suffix, as PNG)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Method used for embedding
        #[arg(short, long, default_value = "direct")]
        method: Method,
    },
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let height: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if width == 0 || height == 0 {
        return Err("watermark size must be non-zero".to_string());
    }
    Ok((width, height))
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn require_file(path: &Path, role: &str) {
    if !path.is_file() {
        eprintln!("Error: {role} does not exist: {}", path.display());
        process::exit(1);
    }
    if !is_supported_image(path) {
        log::warn!("{}: unrecognized image extension", path.display());
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}

/// Lines to print for a successful run: nothing when quiet, the detail line
/// only when verbose.
fn status_lines(output: &Path, summary: &str, detail: &str, opts: &ProcessOptions) -> Vec<String> {
    if opts.quiet {
        return Vec::new();
    }
    let mut lines = vec![format!("[OK] {} ({summary})", display_name(output))];
    if opts.verbose {
        lines.push(format!("  -> {detail}"));
    }
    lines
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let quiet = cli.quiet;

    let outcome = match cli.command {
        Command::Embed {
            carrier,
            watermark,
            output,
            method,
            threshold,
        } => {
            require_file(&carrier, "Carrier image");
            require_file(&watermark, "Watermark image");
            let opts = ProcessOptions {
                method,
                watermark_threshold: threshold,
                verbose: cli.verbose,
                quiet,
            };
            let output = output.unwrap_or_else(|| default_output_path(&carrier, "watermarked"));

            embed_file(&carrier, &watermark, &output, &opts).map(|report| {
                let (cw, ch) = report.carrier_size;
                let (ww, wh) = report.watermark_size;
                let summary = format!("{}, {cw}x{ch} carrier", report.method.label());
                let detail = format!("extract with: --size {ww}x{wh} --method {}", report.method);
                for line in status_lines(&report.output, &summary, &detail, &opts) {
                    eprintln!("{line}");
                }
            })
        }
        Command::Extract {
            watermarked,
            carrier,
            watermark,
            size,
            output,
            method,
        } => {
            require_file(&watermarked, "Watermarked image");
            require_file(&carrier, "Carrier image");
            let source = match (watermark, size) {
                (Some(path), _) => WatermarkSource::File(path),
                (None, Some((width, height))) => WatermarkSource::Dimensions { width, height },
                (None, None) => {
                    eprintln!("Error: either --watermark or --size is required");
                    process::exit(1);
                }
            };
            let opts = ProcessOptions {
                method,
                verbose: cli.verbose,
                quiet,
                ..ProcessOptions::default()
            };
            let output =
                output.unwrap_or_else(|| default_output_path(&watermarked, "extracted"));

            extract_file(&watermarked, &carrier, &source, &output, &opts).map(|report| {
                let (w, h) = report.watermark_size;
                let summary = format!("{w}x{h}, {}", report.method.label());
                let detail = format!("recovered from {}", display_name(&watermarked));
                for line in status_lines(&report.output, &summary, &detail, &opts) {
                    eprintln!("{line}");
                }
            })
        }
    };

    if let Err(e) = outcome {
        eprintln!("[FAIL] {e}");
        process::exit(1);
    }
}
