//! Named, leveled loggers writing plain or JSON lines to the console and to
//! files.
//!
//! ```no_run
//! use namedlog::{attach_file_sink, get_or_create_logger, Severity};
//!
//! let logger = get_or_create_logger("api", Severity::Info, false);
//! attach_file_sink(&logger, "logs/api.log", None, true)?;
//! logger.info("request received")?;
//! # Ok::<(), namedlog::LogError>(())
//! ```

mod error;
pub mod logging;

use std::{path::Path, sync::Arc};

pub use error::{LogError, Result};
pub use logging::{
    Builder, Context, ErrorInfo, FormatConfig, Formatter, Logger, LoggerLayer, Record, Registry,
    Severity, Sink, SinkKind,
};

/// Looks up `name` in the global registry, creating it on first use.
pub fn get_or_create_logger(name: &str, level: Severity, json_format: bool) -> Arc<Logger> {
    Registry::global().get_or_create(name, level, json_format)
}

/// Global registry lookup with the level given by name, e.g. `"DEBUG"`.
pub fn get_logger(name: &str, level: &str, json_format: bool) -> Result<Arc<Logger>> {
    Registry::global().get_logger(name, level, json_format)
}

/// Adds an append-mode file sink to `logger`, creating parent directories.
/// `level` defaults to the logger's own level.
pub fn attach_file_sink(
    logger: &Logger,
    path: impl AsRef<Path>,
    level: Option<Severity>,
    json_format: bool,
) -> Result<()> {
    logger.attach_file_sink(path, level, json_format)
}
