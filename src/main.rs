//! `roi-select`: pick a region of interest on an image file.
//!
//! Opens the selector in a window; when the window is closed the final
//! selection is printed to stdout as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ndarray::ArrayD;
use roi_select::{AppConfig, LoadedImage, LogLevel, RegionSelector, SelectionReport};
use roi_ui::{PngSnapshot, Scalar, Settings};

/// Interactive region of interest selection
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Image to select from (PNG, JPEG, TIFF, ... or a NumPy .npy array)
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Minimum drag span in canvas pixels (overrides the config file)
    #[arg(long, value_name = "PIXELS")]
    minspan: Option<i64>,

    /// Write the initial view to this PNG file
    #[arg(long, value_name = "PNG")]
    snapshot: Option<PathBuf>,

    /// Log verbosity (overrides the config file)
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

impl Args {
    /// Configuration from the file, if any, with flags applied on top.
    fn config(&self) -> roi_select::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(minspan) = self.minspan {
            config.minspan = minspan;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

fn run_selector<P: Scalar>(image: ArrayD<P>, config: &AppConfig) -> roi_select::Result<SelectionReport> {
    let selector = RegionSelector::with_config(image, config)?;
    let settings = Settings {
        window_title: None,
        log_level: config.log_level.to_level_filter(),
    };
    let selector = roi_ui::run(selector, settings)?;
    Ok(selector.report())
}

fn run(args: &Args) -> roi_select::Result<SelectionReport> {
    let config = args.config()?;
    roi_ui::init_logging(config.log_level.to_level_filter());

    if let Some(path) = &args.snapshot {
        log::info!("Writing snapshots to {:?}", path);
        roi_ui::set_display_hook(Box::new(PngSnapshot::new(path)));
    }

    match LoadedImage::load(&args.image)? {
        LoadedImage::U8(image) => run_selector(image, &config),
        LoadedImage::U16(image) => run_selector(image, &config),
        LoadedImage::I16(image) => run_selector(image, &config),
        LoadedImage::I32(image) => run_selector(image, &config),
        LoadedImage::F32(image) => run_selector(image, &config),
        LoadedImage::F64(image) => run_selector(image, &config),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Application error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize selection: {}", e);
            ExitCode::FAILURE
        }
    }
}
