//! CLI definition and entrypoint to executable

use crate::{
    commands::{
        check::CheckCommand, missing::MissingCommand, prune::PruneCommand,
        redundancy::RedundancyCommand,
    },
    prometheus_exporter,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use eyre::WrapErr;
use gapsync_config::Config;
use gapsync_tracing::{
    tracing::{metadata::LevelFilter, Level},
    tracing_subscriber::filter::Directive,
    ColorMode, FileInfo, FileWorkerGuard, GapsyncTracer, LayerInfo, LogFormat, Tracer,
};
use std::{net::SocketAddr, path::PathBuf};
use tracing::info;

/// Parse CLI options, set up logging and run the chosen command.
pub async fn run() -> eyre::Result<()> {
    let opt = Cli::parse();

    let _guard = opt.logs.init_tracing(opt.verbosity.directive())?;
    let config = opt.load_config()?;

    if let Some(listen_addr) = opt.metrics {
        prometheus_exporter::initialize(listen_addr)?;
        info!(target: "gapsync::cli", addr = %listen_addr, "Starting metrics endpoint");
    }

    match opt.command {
        Commands::Check(command) => command.execute(config),
        Commands::Missing(command) => command.execute(config).await,
        Commands::Prune(command) => command.execute(config).await,
        Commands::Redundancy(command) => command.execute(config),
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report missing and excessive heights of a block store.
    #[command(name = "check")]
    Check(CheckCommand),
    /// List heights without a stored copy and fetch them from an upstream snapshot.
    #[command(name = "missing")]
    Missing(MissingCommand),
    /// Drop copies of heights stored more often than the target redundancy.
    #[command(name = "prune")]
    Prune(PruneCommand),
    /// Print the number of heights per copy count.
    #[command(name = "redundancy")]
    Redundancy(RedundancyCommand),
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Gapsync", long_about = None)]
struct Cli {
    /// The command to run
    #[command(subcommand)]
    command: Commands,

    /// The path to the configuration file to use.
    ///
    /// The file is created with default values if it does not exist.
    #[arg(long, value_name = "FILE", global = true, verbatim_doc_comment)]
    config: Option<PathBuf>,

    /// Enable Prometheus metrics.
    ///
    /// The metrics will be served at the given interface and port.
    #[arg(long, value_name = "SOCKET", global = true)]
    metrics: Option<SocketAddr>,

    #[command(flatten)]
    logs: Logs,

    #[command(flatten)]
    verbosity: Verbosity,
}

impl Cli {
    /// Loads the configuration file, or the defaults if none was given.
    fn load_config(&self) -> eyre::Result<Config> {
        let Some(path) = &self.config else { return Ok(Config::default()) };
        let config = Config::from_path(path)
            .wrap_err_with(|| format!("Could not load config file {}", path.display()))?;
        info!(target: "gapsync::cli", ?path, "Configuration loaded");
        Ok(config)
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Logging")]
struct Logs {
    /// The format to use for logs written to stdout.
    #[arg(long = "log.stdout.format", value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    stdout_format: LogFormat,

    /// The filter to use for logs written to stdout.
    #[arg(long = "log.stdout.filter", value_name = "FILTER", global = true, default_value = "")]
    stdout_filter: String,

    /// The path to put log files in.
    ///
    /// Nothing is written to a file unless this is set.
    #[arg(long = "log.file.directory", value_name = "PATH", global = true)]
    file_directory: Option<PathBuf>,

    /// The format to use for logs written to the log file.
    #[arg(long = "log.file.format", value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    file_format: LogFormat,

    /// The filter to use for logs written to the log file.
    #[arg(long = "log.file.filter", value_name = "FILTER", global = true, default_value = "debug")]
    file_filter: String,

    /// Sets whether or not the formatter emits ANSI terminal escape codes for colors and other
    /// text formatting.
    #[arg(long, value_name = "COLOR", global = true, default_value_t = ColorMode::Auto)]
    color: ColorMode,
}

impl Logs {
    /// File name of the log file inside the log directory.
    const FILE_NAME: &'static str = "gapsync.log";

    /// Installs the global subscriber.
    fn init_tracing(&self, default_directive: Directive) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut tracer = GapsyncTracer::new().with_stdout(LayerInfo::new(
            self.stdout_format,
            default_directive.to_string(),
            self.stdout_filter.clone(),
            self.color,
        ));

        if let Some(directory) = &self.file_directory {
            tracer = tracer.with_file(
                LayerInfo::new(
                    self.file_format,
                    LevelFilter::DEBUG.to_string(),
                    self.file_filter.clone(),
                    ColorMode::Never,
                ),
                FileInfo::new(directory, Self::FILE_NAME),
            );
        }

        tracer.init()
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Display")]
struct Verbosity {
    /// Set the minimum log level.
    ///
    /// -v      Errors
    /// -vv     Warnings
    /// -vvv    Info
    /// -vvvv   Debug
    /// -vvvvv  Traces (warning: very verbose!)
    #[arg(short, long, action = ArgAction::Count, global = true, default_value_t = 3, verbatim_doc_comment, help_heading = "Display")]
    verbosity: u8,

    /// Silence all log output.
    #[arg(long, alias = "silent", short = 'q', global = true, help_heading = "Display")]
    quiet: bool,
}

impl Verbosity {
    /// Get the corresponding [Directive] for the given verbosity, or off if the verbosity
    /// corresponds to silent.
    fn directive(&self) -> Directive {
        if self.quiet {
            LevelFilter::OFF.into()
        } else {
            let level = match self.verbosity.saturating_sub(1) {
                0 => Level::ERROR,
                1 => Level::WARN,
                2 => Level::INFO,
                3 => Level::DEBUG,
                _ => Level::TRACE,
            };

            LevelFilter::from_level(level).into()
        }
    }
}
