use std::{
    fmt::Display,
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{error::Result, logging::Severity};

/// Caller supplied key/value pairs carried on a [`Record`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Fails with `LogError::Serialization` when `value` has no JSON form,
    /// e.g. a map keyed by something other than strings.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.0.insert(key.into(), value);
        Ok(())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Result<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert_value(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Error details attached to a record emitted from an error-handling path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    kind: Option<String>,
    message: String,
}

impl ErrorInfo {
    pub fn new(kind: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Kind is the short type name of `E`. A trait object has no
    /// recoverable concrete type, so its kind stays unknown.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self {
            kind: short_type_name(std::any::type_name::<E>()),
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("Unknown")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Last path segment of a type name. Smart pointers and references are
/// looked through, so `Box<app::MyErr>` yields `MyErr`.
fn short_type_name(full: &str) -> Option<String> {
    let full = full.trim();
    let full = full
        .strip_prefix("&mut ")
        .or_else(|| full.strip_prefix('&'))
        .unwrap_or(full)
        .trim_start();

    if full.starts_with("dyn ") {
        return None;
    }

    let (base, args) = match (full.find('<'), full.rfind('>')) {
        (Some(open), Some(close)) if open < close => (&full[..open], Some(&full[open + 1..close])),
        _ => (full, None),
    };
    let name = base.rsplit("::").next().filter(|name| !name.is_empty())?;

    match (name, args) {
        ("Box" | "Arc" | "Rc", Some(args)) => short_type_name(first_type_argument(args)),
        _ => Some(name.to_string()),
    }
}

fn first_type_argument(args: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in args.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return &args[..i],
            _ => {}
        }
    }

    args
}

/// One log event. Built at emit time and consumed by the formatters.
#[derive(Debug, Clone)]
pub struct Record {
    timestamp: DateTime<Local>,
    severity: Severity,
    logger_name: String,
    message: String,
    source_path: String,
    source_line: u32,
    error: Option<ErrorInfo>,
    context: Context,
}

impl Record {
    /// The source location defaults to the caller of this function, or of
    /// the outermost `#[track_caller]` function leading here.
    #[track_caller]
    pub fn new(severity: Severity, logger_name: impl Into<String>, message: impl Display) -> Self {
        let caller = Location::caller();

        Self {
            timestamp: Local::now(),
            severity,
            logger_name: logger_name.into(),
            message: message.to_string(),
            source_path: absolute_path(caller.file()),
            source_line: caller.line(),
            error: None,
            context: Context::new(),
        }
    }

    pub fn at(self, path: impl AsRef<Path>, line: u32) -> Self {
        Self {
            source_path: absolute_path(path),
            source_line: line,
            ..self
        }
    }

    pub fn with_timestamp(self, timestamp: DateTime<Local>) -> Self {
        Self { timestamp, ..self }
    }

    pub fn with_error(self, error: ErrorInfo) -> Self {
        Self {
            error: Some(error),
            ..self
        }
    }

    pub fn with_context(self, context: Context) -> Self {
        Self { context, ..self }
    }

    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn source_line(&self) -> u32 {
        self.source_line
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

// NOTE: compile-time file paths are relative to the workspace that built the
// caller, so resolving against the working directory is a best effort.
fn absolute_path(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    std::path::absolute(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::LogError;

    #[test]
    fn captures_caller_location() {
        let line = line!() + 1;
        let record = Record::new(Severity::Info, "test", "hello");

        assert_eq!(record.source_line(), line);
        assert!(record.source_path().ends_with("record.rs"));
        assert!(Path::new(record.source_path()).is_absolute());
        assert!(record.error().is_none());
        assert!(record.context().is_empty());
    }

    #[test]
    fn explicit_location_overrides_caller() {
        let record = Record::new(Severity::Info, "test", "hello").at("/srv/app/main.rs", 42);

        assert_eq!(record.source_path(), "/srv/app/main.rs");
        assert_eq!(record.source_line(), 42);
    }

    #[test]
    fn error_kind_comes_from_concrete_type() {
        let err = std::fmt::Error;
        let info = ErrorInfo::from_error(&err);

        assert_eq!(info.kind(), "Error");
        assert_eq!(info.message(), "an error occurred when formatting an argument");
    }

    #[derive(Debug)]
    struct MyErr;

    impl Display for MyErr {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "my error")
        }
    }

    impl std::error::Error for MyErr {}

    #[test]
    fn error_kind_looks_through_smart_pointers() {
        let boxed = Box::new(MyErr);
        assert_eq!(ErrorInfo::from_error(&boxed).kind(), "MyErr");

        let shared = std::sync::Arc::new(MyErr);
        assert_eq!(ErrorInfo::from_error(&shared).kind(), "MyErr");
        assert_eq!(ErrorInfo::from_error(&shared).message(), "my error");
    }

    #[test]
    fn error_kind_unknown_for_trait_objects() {
        let err: Box<dyn std::error::Error> = "boom".into();
        let info = ErrorInfo::from_error(err.as_ref());

        assert_eq!(info.kind(), "Unknown");
        assert_eq!(info.message(), "boom");
    }

    #[test]
    fn short_type_name_strips_paths_and_generics() {
        assert_eq!(
            short_type_name("std::num::ParseIntError").as_deref(),
            Some("ParseIntError")
        );
        assert_eq!(
            short_type_name("my::Wrapper<std::io::Error>").as_deref(),
            Some("Wrapper")
        );
        assert_eq!(short_type_name("dyn core::error::Error"), None);
    }

    #[test]
    fn short_type_name_unwraps_pointer_types() {
        assert_eq!(
            short_type_name("alloc::sync::Arc<alloc::boxed::Box<app::MyErr>>").as_deref(),
            Some("MyErr")
        );
        assert_eq!(
            short_type_name("&alloc::rc::Rc<app::Wrapper<std::io::Error>>").as_deref(),
            Some("Wrapper")
        );
        assert_eq!(
            short_type_name("alloc::boxed::Box<dyn core::error::Error + Send + Sync>"),
            None
        );
        assert_eq!(
            short_type_name("alloc::boxed::Box<app::MyErr, alloc::alloc::Global>").as_deref(),
            Some("MyErr")
        );
    }

    #[test]
    fn context_rejects_values_without_json_form() {
        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple keys");

        let mut context = Context::new();
        let result = context.insert("bad", bad);

        assert!(matches!(result, Err(LogError::Serialization(_))));
        assert!(context.is_empty());
    }

    #[test]
    fn context_keeps_serializable_values() {
        let context = Context::new()
            .with("user_id", 12345)
            .and_then(|c| c.with("status", "failed"))
            .unwrap();

        assert_eq!(context.len(), 2);
        assert_eq!(context.get("user_id"), Some(&Value::from(12345)));
    }
}
