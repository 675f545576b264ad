//! Logging setup for gapsync.
//!
//! The entry point is [`GapsyncTracer`]. It always logs to stdout and can additionally write to a
//! log file through a non-blocking worker.
//!
//! # Examples
//!
//! ```
//! use gapsync_tracing::{
//!     tracing::level_filters::LevelFilter, ColorMode, GapsyncTracer, LayerInfo, LogFormat, Tracer,
//! };
//!
//! fn main() -> eyre::Result<()> {
//!     let tracer = GapsyncTracer::new().with_stdout(LayerInfo::new(
//!         LogFormat::Json,
//!         LevelFilter::INFO.to_string(),
//!         "reconcile=debug".to_string(),
//!         ColorMode::Never,
//!     ));
//!
//!     let _guard = tracer.init()?;
//!
//!     // Your application logic here
//!
//!     Ok(())
//! }
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

// Re-export tracing crates
pub use tracing;
pub use tracing_subscriber;

// Re-export our types
pub use formatter::{ColorMode, LogFormat};
pub use layers::{FileInfo, FileWorkerGuard};
pub use test_tracer::TestTracer;

mod formatter;
mod layers;
mod test_tracer;

use crate::layers::Layers;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tracer for application logging.
///
/// Holds the stdout layer configuration and an optional file layer.
#[derive(Debug, Clone)]
pub struct GapsyncTracer {
    stdout: LayerInfo,
    file: Option<(LayerInfo, FileInfo)>,
}

impl GapsyncTracer {
    /// Constructs a new tracer with the default stdout layer and no file layer.
    pub fn new() -> Self {
        Self { stdout: LayerInfo::default(), file: None }
    }

    /// Sets a custom configuration for the stdout layer.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Sets the file layer configuration and associated file info.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Default for GapsyncTracer {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a logging layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: ColorMode,
}

impl LayerInfo {
    ///  Constructs a new `LayerInfo`.
    ///
    ///  # Arguments
    ///  * `format` - Specifies the format for log messages.
    ///  * `default_directive` - Directive for filtering log messages.
    ///  * `filters` - Additional comma separated filtering directives.
    ///  * `color` - When stdout output is colored. File output never is.
    pub const fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: ColorMode,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    /// Terminal format, INFO level, no additional filters, colored if stdout is a terminal.
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: LevelFilter::INFO.to_string(),
            filters: String::new(),
            color: ColorMode::Auto,
        }
    }
}

/// Trait defining a general interface for logging configuration.
pub trait Tracer {
    /// Initialize the logging configuration.
    ///
    /// Returns the worker guard of the file layer, if one is configured. Dropping the guard
    /// flushes buffered file output.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

impl Tracer for GapsyncTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.default_directive.parse()?,
            &self.stdout.filters,
            self.stdout.color,
        )?;

        let file_guard = if let Some((config, file_info)) = self.file {
            Some(layers.file(config.format, &config.filters, file_info)?)
        } else {
            None
        };

        // The error is returned if the global default subscriber is already set,
        // so it's safe to ignore it
        let _ = tracing_subscriber::registry().with(layers.into_inner()).try_init();
        Ok(file_guard)
    }
}
