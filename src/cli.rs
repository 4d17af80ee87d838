//! Command-line interface for Wavecut
//!
//! Handles argument parsing and logging configuration.

use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

use crate::editor::{AUTOCUT_THRESHOLD, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Wavecut - upload short recordings and trim them to a cut window
#[derive(Parser, Debug)]
#[command(name = "wavecut")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase logging verbosity
    /// -v = info, -vv = debug, -vvv = trace, -vvvv = all deps
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding the recordings and cuts.json
    #[arg(long, env = "WAVECUT_ROOT", global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "WAVECUT_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// List stored recordings and their cut windows
    List,
    /// Render a recording's waveform and cut markers as text
    Show {
        name: String,

        /// Trim leading and trailing silence before rendering
        #[arg(long)]
        autocut: bool,

        /// Energy threshold used by --autocut
        #[arg(long, default_value_t = AUTOCUT_THRESHOLD)]
        threshold: f32,

        /// Drag the marker nearest FROM_PX to TO_PX before rendering.
        /// Repeat to apply several gestures in order
        #[arg(
            long,
            num_args = 2,
            value_names = ["FROM_PX", "TO_PX"],
            action = clap::ArgAction::Append,
            allow_negative_numbers = true
        )]
        drag: Vec<f64>,

        /// Persist the resulting cut window
        #[arg(long)]
        save: bool,

        #[arg(long, default_value_t = DISPLAY_WIDTH)]
        width: usize,

        #[arg(long, default_value_t = DISPLAY_HEIGHT)]
        height: usize,
    },
    /// Write the cut segment of a recording to a WAV file
    Export { name: String, output: PathBuf },
}

impl Args {
    /// Get the log level filter based on verbosity flags
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }
}

/// Initialize the logging system based on CLI arguments
pub fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    // Base level for all modules - keep at warn to suppress noisy deps
    builder.filter_level(LevelFilter::Warn);

    builder.filter_module("wavecut", args.log_level());

    // HTTP stack internals only at -vvvv
    if args.verbose >= 4 {
        builder.filter_module("axum", args.log_level());
        builder.filter_module("hyper", args.log_level());
    }

    builder.format_timestamp_millis().init();
}
