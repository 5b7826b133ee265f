use std::{
    fmt::{Display, Write},
    panic::Location,
    path::Path,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{
    format::{Item, StrftimeItems},
    DateTime, Local,
};
use log::Log;

use super::{
    formatters::Formatter,
    sinks::{Sink, SinkKind},
    Context, ErrorInfo, LogFormatter, LogSink, Record, Severity,
};
use crate::error::{LogError, Result};

#[derive(Debug, Clone)]
pub struct FormatConfig {
    pub datetime_format: String,
    pub use_ansi: bool,
}

impl FormatConfig {
    pub fn new() -> Self {
        Self {
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            use_ansi: false,
        }
    }

    /// Rejects a `datetime_format` chrono cannot render.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.datetime_format).any(|item| matches!(item, Item::Error)) {
            return Err(LogError::InvalidDatetimeFormat(self.datetime_format.clone()));
        }

        Ok(())
    }

    pub(crate) fn render_timestamp(&self, timestamp: &DateTime<Local>) -> Result<String> {
        let mut rendered = String::new();
        write!(rendered, "{}", timestamp.format(&self.datetime_format))
            .map_err(|_| LogError::InvalidDatetimeFormat(self.datetime_format.clone()))?;

        Ok(rendered)
    }

    /// File output never carries escape codes.
    pub(crate) fn without_ansi(&self) -> Self {
        Self {
            use_ansi: false,
            ..self.clone()
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Attachment {
    sink: Sink,
    formatter: Formatter,
    level: Severity,
}

/// A named logger. Shared through `Arc`, sinks are only ever appended.
#[derive(Debug)]
pub struct Logger {
    name: String,
    level: Severity,
    config: FormatConfig,
    sinks: RwLock<Vec<Attachment>>,
}

impl Logger {
    pub fn new(name: impl Into<String>, level: Severity, config: FormatConfig) -> Self {
        Self {
            name: name.into(),
            level,
            config,
            sinks: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    // A panic while holding the lock cannot leave the list half-updated.
    fn read_sinks(&self) -> RwLockReadGuard<'_, Vec<Attachment>> {
        self.sinks.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_sinks(&self) -> RwLockWriteGuard<'_, Vec<Attachment>> {
        self.sinks.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Appends a sink. `level` defaults to the logger's own level.
    pub fn attach_sink(&self, sink: Sink, formatter: Formatter, level: Option<Severity>) {
        let level = level.unwrap_or(self.level);
        self.write_sinks().push(Attachment {
            sink,
            formatter,
            level,
        });
    }

    pub fn attach_file_sink(
        &self,
        path: impl AsRef<Path>,
        level: Option<Severity>,
        json_format: bool,
    ) -> Result<()> {
        let sink = Sink::file(path)?;
        let formatter = Formatter::select(json_format, self.config.without_ansi());
        self.attach_sink(sink, formatter, level);
        Ok(())
    }

    pub fn sink_count(&self) -> usize {
        self.read_sinks().len()
    }

    pub fn sink_kinds(&self) -> Vec<SinkKind> {
        self.read_sinks().iter().map(|a| a.sink.kind()).collect()
    }

    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl Display) -> Result<()> {
        let caller = Location::caller();
        self.emit(severity, message, caller, None, None)
    }

    #[track_caller]
    pub fn log_with(
        &self,
        severity: Severity,
        message: impl Display,
        context: Context,
    ) -> Result<()> {
        let caller = Location::caller();
        self.emit(severity, message, caller, Some(context), None)
    }

    #[track_caller]
    pub fn log_with_error<E>(
        &self,
        severity: Severity,
        message: impl Display,
        err: &E,
    ) -> Result<()>
    where
        E: std::error::Error + ?Sized,
    {
        let caller = Location::caller();
        self.emit(severity, message, caller, None, Some(ErrorInfo::from_error(err)))
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) -> Result<()> {
        let caller = Location::caller();
        self.emit(Severity::Debug, message, caller, None, None)
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) -> Result<()> {
        let caller = Location::caller();
        self.emit(Severity::Info, message, caller, None, None)
    }

    #[track_caller]
    pub fn warning(&self, message: impl Display) -> Result<()> {
        let caller = Location::caller();
        self.emit(Severity::Warning, message, caller, None, None)
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) -> Result<()> {
        let caller = Location::caller();
        self.emit(Severity::Error, message, caller, None, None)
    }

    #[track_caller]
    pub fn critical(&self, message: impl Display) -> Result<()> {
        let caller = Location::caller();
        self.emit(Severity::Critical, message, caller, None, None)
    }

    /// Logs at ERROR with the details of `err` attached.
    #[track_caller]
    pub fn exception<E>(&self, message: impl Display, err: &E) -> Result<()>
    where
        E: std::error::Error + ?Sized,
    {
        let caller = Location::caller();
        self.emit(Severity::Error, message, caller, None, Some(ErrorInfo::from_error(err)))
    }

    fn emit(
        &self,
        severity: Severity,
        message: impl Display,
        caller: &Location<'_>,
        context: Option<Context>,
        error: Option<ErrorInfo>,
    ) -> Result<()> {
        if !self.is_enabled_for(severity) {
            return Ok(());
        }

        let mut record =
            Record::new(severity, self.name.as_str(), message).at(caller.file(), caller.line());
        if let Some(context) = context {
            record = record.with_context(context);
        }
        if let Some(error) = error {
            record = record.with_error(error);
        }

        self.dispatch(&record)
    }

    /// Sends a pre-built record through the level check and every sink.
    pub fn log_record(&self, record: &Record) -> Result<()> {
        if !self.is_enabled_for(record.severity()) {
            return Ok(());
        }

        self.dispatch(record)
    }

    fn dispatch(&self, record: &Record) -> Result<()> {
        for attachment in self.read_sinks().iter() {
            if record.severity() < attachment.level {
                continue;
            }

            let line = attachment.formatter.format(record)?;
            attachment.sink.write_line(&line)?;
        }

        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        for attachment in self.read_sinks().iter() {
            attachment.sink.flush()?;
        }

        Ok(())
    }

    /// Makes this logger the backend of the `log` facade.
    pub fn install(self: Arc<Self>) -> Result<()> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(FacadeLogger(self)))
            .map_err(|_| LogError::AlreadyInstalled)?;
        log::set_max_level(filter);

        Ok(())
    }
}

struct FacadeLogger(Arc<Logger>);

impl Log for FacadeLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.0.is_enabled_for(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut context = Context::new();
        context.insert_value("target", record.target().into());

        let converted = Record::new(record.level().into(), self.0.name(), record.args())
            .at(record.file().unwrap_or("<unknown>"), record.line().unwrap_or(0))
            .with_context(context);

        if let Err(err) = self.0.dispatch(&converted) {
            eprintln!("namedlog: failed writing log record: {}", err);
        }
    }

    fn flush(&self) {
        if let Err(err) = self.0.flush() {
            eprintln!("namedlog: failed flushing sinks: {}", err);
        }
    }
}

/// Assembles a [`Logger`] with its initial sinks.
pub struct Builder {
    name: String,
    level: Severity,
    json_format: bool,
    config: FormatConfig,
    stderr: bool,
    files: Vec<String>,
}

impl Builder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Severity::Info,
            json_format: false,
            config: FormatConfig::new(),
            stderr: false,
            files: Vec::new(),
        }
    }

    pub fn with_level(self, level: Severity) -> Self {
        Self { level, ..self }
    }

    pub fn with_json(self, json_format: bool) -> Self {
        Self {
            json_format,
            ..self
        }
    }

    pub fn with_config(self, config: FormatConfig) -> Self {
        Self { config, ..self }
    }

    pub fn with_stderr_sink(self) -> Self {
        Self {
            stderr: true,
            ..self
        }
    }

    pub fn with_file_sink(mut self, path: impl Into<String>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Console first, then files in the order they were added.
    pub fn build(&self) -> Result<Logger> {
        self.config.validate()?;

        let logger = Logger::new(self.name.clone(), self.level, self.config.clone());

        if self.stderr {
            let formatter = Formatter::select(self.json_format, self.config.clone());
            logger.attach_sink(Sink::stderr(), formatter, None);
        }

        for path in &self.files {
            logger.attach_file_sink(path, None, self.json_format)?;
        }

        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn bad_datetime_format_fails_the_emit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let config = FormatConfig {
            datetime_format: "%Y %Q".to_string(),
            ..FormatConfig::new()
        };
        let logger = Logger::new("stamp", Severity::Info, config);
        logger.attach_file_sink(&path, None, false).unwrap();

        assert!(matches!(
            logger.info("never written"),
            Err(LogError::InvalidDatetimeFormat(_))
        ));
        assert!(read_lines(&path).is_empty());
    }

    #[test]
    fn builder_rejects_bad_datetime_format() {
        let config = FormatConfig {
            datetime_format: "%Q".to_string(),
            ..FormatConfig::new()
        };
        let built = Builder::new("stamp").with_config(config).build();
        assert!(matches!(built, Err(LogError::InvalidDatetimeFormat(f)) if f == "%Q"));

        assert!(FormatConfig::new().validate().is_ok());
    }

    #[test]
    fn drops_records_below_logger_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = Logger::new("filter", Severity::Info, FormatConfig::new());
        logger.attach_file_sink(&path, None, false).unwrap();

        logger.debug("hidden").unwrap();
        logger.info("one").unwrap();
        logger.warning("two").unwrap();
        logger.error("three").unwrap();
        logger.critical("four").unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("[INFO] filter: one"));
        assert!(lines[1].ends_with("[WARNING] filter: two"));
        assert!(lines[2].ends_with("[ERROR] filter: three"));
        assert!(lines[3].ends_with("[CRITICAL] filter: four"));
    }

    #[test]
    fn sink_level_filters_independently() {
        let dir = tempfile::tempdir().unwrap();
        let all = dir.path().join("all.log");
        let errors = dir.path().join("errors.log");
        let logger = Logger::new("split", Severity::Debug, FormatConfig::new());
        logger.attach_file_sink(&all, None, false).unwrap();
        logger
            .attach_file_sink(&errors, Some(Severity::Error), false)
            .unwrap();

        logger.debug("d").unwrap();
        logger.error("e").unwrap();

        assert_eq!(read_lines(&all).len(), 2);
        let error_lines = read_lines(&errors);
        assert_eq!(error_lines.len(), 1);
        assert!(error_lines[0].ends_with(": e"));
    }

    #[test]
    fn json_lines_point_at_the_call_site() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        let logger = Logger::new("json", Severity::Info, FormatConfig::new());
        logger.attach_file_sink(&path, None, true).unwrap();

        let line = line!() + 1;
        logger.info("x").unwrap();

        let lines = read_lines(&path);
        let value: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["message"], "x");
        assert_eq!(value["line"], line);
        assert!(value["path"].as_str().unwrap().ends_with("logger.rs"));
    }

    #[test]
    fn exception_attaches_error_details() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        let logger = Logger::new("exc", Severity::Info, FormatConfig::new());
        logger.attach_file_sink(&path, None, true).unwrap();

        let err = "abc".parse::<u8>().unwrap_err();
        logger.exception("could not parse", &err).unwrap();

        let value: Value = serde_json::from_str(&read_lines(&path)[0]).unwrap();
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["exception"]["type"], "ParseIntError");
    }

    #[test]
    fn context_is_accepted_but_not_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        let logger = Logger::new("ctx", Severity::Info, FormatConfig::new());
        logger.attach_file_sink(&path, None, true).unwrap();

        let context = Context::new().with("user_id", 12345).unwrap();
        logger
            .log_with(Severity::Warning, "Processing failed", context)
            .unwrap();

        let value: Value = serde_json::from_str(&read_lines(&path)[0]).unwrap();
        assert_eq!(value["message"], "Processing failed");
        assert!(value.get("user_id").is_none());
    }

    #[test]
    fn file_output_never_carries_ansi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let config = FormatConfig {
            use_ansi: true,
            ..FormatConfig::new()
        };
        let logger = Logger::new("ansi", Severity::Info, config);
        logger.attach_file_sink(&path, None, false).unwrap();

        logger.error("plain").unwrap();

        assert!(!read_lines(&path)[0].contains('\x1b'));
    }

    #[test]
    fn builder_orders_console_before_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.log");
        let second = dir.path().join("b.log");

        let logger = Builder::new("built")
            .with_level(Severity::Warning)
            .with_file_sink(first.to_string_lossy())
            .with_stderr_sink()
            .with_file_sink(second.to_string_lossy())
            .build()
            .unwrap();

        assert_eq!(logger.level(), Severity::Warning);
        assert_eq!(
            logger.sink_kinds(),
            vec![SinkKind::Console, SinkKind::File, SinkKind::File]
        );
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn log_record_respects_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = Logger::new("records", Severity::Warning, FormatConfig::new());
        logger.attach_file_sink(&path, None, false).unwrap();

        logger
            .log_record(&Record::new(Severity::Info, "records", "skipped"))
            .unwrap();
        logger
            .log_record(&Record::new(Severity::Error, "records", "kept"))
            .unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("kept"));
    }
}
