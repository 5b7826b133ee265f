mod formatters;
mod layer;
mod logger;
mod record;
mod registry;
mod severity;
mod sinks;

pub use formatters::{Formatter, JsonFormatter, PlainFormatter};
pub use layer::LoggerLayer;
pub use logger::{Builder, FormatConfig, Logger};
pub use record::{Context, ErrorInfo, Record};
pub use registry::Registry;
pub use severity::Severity;
pub use sinks::{ConsoleSink, ConsoleStream, FileSink, Sink, SinkKind};

use crate::error::Result;

pub trait LogFormatter: Sync + Send {
    fn format(&self, record: &Record) -> Result<String>;
}

pub trait LogSink: Sync + Send {
    /// Writes one rendered record followed by a newline.
    fn write_line(&self, line: &str) -> Result<()>;
    fn flush(&self) -> Result<()>;
}
