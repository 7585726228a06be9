//! # Barline CLI
//!
//! Command-line interface for barcode generation.
//!
//! ## Usage
//!
//! ```bash
//! # List barcode types and image formats
//! barline list
//!
//! # Code 39 as SVG (default)
//! barline create "HELLO 39" hello
//!
//! # EAN-13 as PNG without human-readable text
//! barline create -b ean13 -t png --no-text 590123412345 ean
//!
//! # Compressed SVG with overrides from a config file and the command line
//! barline create -b code128 -c --config label.json -o module_height=8 "ABC-123" label
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use barline::{BarlineError, OptionOverrides, OutputFormat, PROVIDED_BARCODES, writer::RasterFormat};

/// Barline - 1D barcode generator
#[derive(Parser, Debug)]
#[command(name = "barline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a barcode and save it
    Create {
        /// Text to encode
        code: String,

        /// Output path without extension
        output: PathBuf,

        /// Barcode type (see `barline list`)
        #[arg(short, long, default_value = "code39")]
        barcode: String,

        /// Output type: svg or an image format (see `barline list`)
        #[arg(short = 't', long, default_value = "svg")]
        file_type: String,

        /// Gzip SVG output (.svgz)
        #[arg(short, long)]
        compress: bool,

        /// Text to show instead of the encoded code
        #[arg(long)]
        text: Option<String>,

        /// Do not write text under the barcode
        #[arg(long)]
        no_text: bool,

        /// Font size in points
        #[arg(long)]
        font_size: Option<f64>,

        /// Distance between bars and text in mm
        #[arg(long, value_name = "MM")]
        text_distance: Option<f64>,

        /// Bar height in mm
        #[arg(long, value_name = "MM")]
        module_height: Option<f64>,

        /// Width of the narrowest bar in mm
        #[arg(long, value_name = "MM")]
        module_width: Option<f64>,

        /// Blank margin left and right in mm
        #[arg(long, value_name = "MM")]
        quiet_zone: Option<f64>,

        /// JSON file with writer options
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Writer option override, may be repeated
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },

    /// List available barcode types and image formats
    List,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env().filter_level(level).init();
}

fn run() -> Result<(), BarlineError> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::List => {
            list();
            Ok(())
        }
        Commands::Create {
            code,
            output,
            barcode,
            file_type,
            compress,
            text,
            no_text,
            font_size,
            text_distance,
            module_height,
            module_width,
            quiet_zone,
            config,
            options,
        } => {
            let format: OutputFormat = file_type.parse()?;

            // Config file first, then -o pairs, then dedicated flags
            let mut overrides = match config {
                Some(path) => OptionOverrides::from_json_file(&path)?,
                None => OptionOverrides::new(),
            };
            for pair in &options {
                overrides.set_pair(pair)?;
            }
            if compress {
                overrides.set("compress", "true");
            }
            if let Some(text) = text {
                overrides.set("text", text);
            }
            if no_text {
                overrides.set("write_text", "false");
            }
            let numeric = [
                ("font_size", font_size),
                ("text_distance", text_distance),
                ("module_height", module_height),
                ("module_width", module_width),
                ("quiet_zone", quiet_zone),
            ];
            for (key, value) in numeric {
                if let Some(value) = value {
                    overrides.set(key, value.to_string());
                }
            }

            let path = barline::generate(&barcode, &code, format, &overrides, &output)?;
            println!("New barcode saved as {}.", path.display());
            Ok(())
        }
    }
}

fn list() {
    println!("Available barcode types:");
    for name in PROVIDED_BARCODES {
        println!("  {}", name);
    }
    println!();
    println!("Available image types:");
    println!("  svg");
    if OutputFormat::raster_available() {
        for format in RasterFormat::ALL {
            println!("  {}", format.extension());
        }
    } else {
        println!("  (raster formats disabled, build with the 'raster' feature)");
    }
}
