// src/system/logging.rs

//! Logger setup for the binary.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Errors raised while setting up logging.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The `--log` file could not be created.
    #[error("Failed to open log file '{path}': {source}")]
    OpenLogFile {
        /// The requested log file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Console level: `info`, or `debug` with `--verbose`.
fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Sends each record to the console logger and, when `--log` is given, to a
/// file logger that always records at `debug`.
#[derive(Debug)]
pub struct TeeLogger {
    console: env_logger::Logger,
    file: Option<env_logger::Logger>,
}

impl TeeLogger {
    /// Builds the console logger and the optional file logger.
    ///
    /// `RUST_LOG` overrides the console level only.
    pub fn new(verbose: bool, log_file: Option<&Path>) -> Result<Self, LoggingError> {
        let console = env_logger::Builder::new()
            .filter_level(console_level(verbose))
            .parse_default_env()
            .build();

        let file = match log_file {
            Some(path) => {
                let file = File::create(path).map_err(|source| LoggingError::OpenLogFile {
                    path: path.display().to_string(),
                    source,
                })?;
                let logger = env_logger::Builder::new()
                    .filter_level(LevelFilter::Debug)
                    .write_style(env_logger::WriteStyle::Never)
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .build();
                Some(logger)
            }
            None => None,
        };

        Ok(Self { console, file })
    }

    /// The most verbose level any of the sinks accepts.
    pub fn max_level(&self) -> LevelFilter {
        self.file
            .as_ref()
            .map_or(self.console.filter(), |file| file.filter().max(self.console.filter()))
    }
}

impl Log for TeeLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.console.enabled(metadata)
            || self.file.as_ref().is_some_and(|file| file.enabled(metadata))
    }

    fn log(&self, record: &Record<'_>) {
        if self.console.matches(record) {
            self.console.log(record);
        }
        if let Some(file) = &self.file
            && file.matches(record)
        {
            file.log(record);
        }
    }

    fn flush(&self) {
        self.console.flush();
        if let Some(file) = &self.file {
            file.flush();
        }
    }
}

/// Initializes the global logger.
///
/// Records at `info` and above go to stderr (`debug` with `--verbose`). With a
/// log file, every `debug` record is written there as well.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), LoggingError> {
    let logger = TeeLogger::new(verbose, log_file)?;
    let max_level = logger.max_level();

    match log::set_boxed_logger(Box::new(logger)) {
        Ok(()) => log::set_max_level(max_level),
        // Only reachable when something else installed a logger first.
        Err(e) => log::debug!("Keeping the existing logger: {}", e),
    }
    Ok(())
}
