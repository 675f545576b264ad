use crate::layers::BoxedLayer;
use clap::ValueEnum;
use std::{fmt, io::IsTerminal};
use tracing::Level;
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Output format of a log layer.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// `key=value` pairs, one line per event.
    #[value(name = "logfmt")]
    LogFmt,
    /// Human readable lines.
    Terminal,
}

impl LogFormat {
    /// Builds the layer for this format.
    ///
    /// Events go to stdout unless a `file_writer` is given. Event targets are only printed when
    /// `filter` lets debug events through, since the info level messages of gapsync are written
    /// to be read on their own.
    pub(crate) fn apply(
        self,
        filter: EnvFilter,
        ansi: bool,
        file_writer: Option<NonBlocking>,
    ) -> BoxedLayer<Registry> {
        let target = filter.max_level_hint().is_none_or(|max_level| max_level > Level::INFO);

        match (self, file_writer) {
            (Self::Json, Some(writer)) => tracing_subscriber::fmt::layer()
                .json()
                .with_target(target)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
            (Self::Json, None) => {
                tracing_subscriber::fmt::layer().json().with_target(target).with_filter(filter).boxed()
            }
            (Self::LogFmt, Some(writer)) => tracing_logfmt::builder()
                .with_target(target)
                .layer()
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
            (Self::LogFmt, None) => {
                tracing_logfmt::builder().with_target(target).layer().with_filter(filter).boxed()
            }
            (Self::Terminal, Some(writer)) => tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(target)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
            (Self::Terminal, None) => tracing_subscriber::fmt::layer()
                .with_ansi(ansi)
                .with_target(target)
                .with_filter(filter)
                .boxed(),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::LogFmt => f.write_str("logfmt"),
            Self::Terminal => f.write_str("terminal"),
        }
    }
}

/// When terminal output is colored.
#[derive(Debug, Copy, Clone, Default, ValueEnum, Eq, PartialEq)]
pub enum ColorMode {
    /// Always emit ANSI escape codes.
    Always,
    /// Emit ANSI escape codes only if stdout is a terminal.
    #[default]
    Auto,
    /// Never emit ANSI escape codes.
    Never,
}

impl ColorMode {
    /// Returns `true` if stdout output should carry ANSI escape codes.
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Never => false,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::Auto => f.write_str("auto"),
            Self::Never => f.write_str("never"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_value_names() {
        for format in LogFormat::value_variants() {
            assert_eq!(LogFormat::from_str(&format.to_string(), false).unwrap(), *format);
        }
        for color in ColorMode::value_variants() {
            assert_eq!(ColorMode::from_str(&color.to_string(), false).unwrap(), *color);
        }
    }

    #[test]
    fn explicit_color_modes() {
        assert!(ColorMode::Always.enabled());
        assert!(!ColorMode::Never.enabled());
    }
}
