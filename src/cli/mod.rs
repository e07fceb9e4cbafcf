//! Command-line interface implementation
//!
//! Parses arguments, configures logging and hands off to the conversion
//! command.

mod convert;

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// atlasconv - Convert sprite atlas XML manifests to JSON
#[derive(Debug, Parser)]
#[command(name = "atlasconv")]
#[command(about = "Convert sprite atlas XML manifests (BASE.xml) into JSON keyed by sprite name (BASE.json)")]
#[command(version)]
pub struct Cli {
    /// Base filenames without extension.
    /// Each BASE.xml is converted to BASE.json.
    /// Defaults to ./allSprites_retina and ./allSprites_default
    pub bases: Vec<PathBuf>,

    /// Config file (default: atlasconv.toml in this or a parent directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Attempt every file even after one fails
    #[arg(long)]
    pub keep_going: bool,

    /// Fail when a sprite name appears twice instead of keeping the last one
    #[arg(long)]
    pub strict_duplicates: bool,

    /// Log each file as it is converted
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}

/// Logger is configured from flags only; the environment is not consulted.
fn init_logger(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level());

    convert::run_convert(
        &cli.bases,
        cli.config.as_deref(),
        cli.keep_going,
        cli.strict_duplicates,
        cli.quiet,
    )
}
