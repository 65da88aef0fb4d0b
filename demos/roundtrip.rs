//! Embed a watermark into an image, then extract it again.
//!
//! Usage:
//! ```sh
//! cargo run --example roundtrip -- carrier.png watermark.png [method]
//! ```

use std::env;
use std::path::Path;
use std::process;

use lsb_watermark::{
    default_output_path, embed_file, extract_file, Method, ProcessOptions, WatermarkSource,
};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <carrier> <watermark> [method]", args[0]);
        process::exit(1);
    }

    let carrier = Path::new(&args[1]);
    let watermark = Path::new(&args[2]);
    let method = match args.get(3).map(|m| m.parse::<Method>()) {
        None => Method::default(),
        Some(Ok(m)) => m,
        Some(Err(e)) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let opts = ProcessOptions {
        method,
        ..ProcessOptions::default()
    };
    let marked = default_output_path(carrier, "watermarked");
    let extracted = default_output_path(watermark, "extracted");

    let report = match embed_file(carrier, watermark, &marked, &opts) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    println!("Embedded: {}", report.output.display());

    let (width, height) = report.watermark_size;
    let source = WatermarkSource::Dimensions { width, height };
    match extract_file(&marked, carrier, &source, &extracted, &opts) {
        Ok(r) => println!("Extracted: {}", r.output.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
