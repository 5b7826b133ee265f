use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use lazy_static::lazy_static;

use super::{FormatConfig, Formatter, Logger, Severity, Sink};
use crate::error::Result;

lazy_static! {
    static ref GLOBAL: Registry = Registry::new();
}

/// Name to logger cache. Each name maps to exactly one [`Logger`] for as
/// long as the registry lives; there is no way to remove an entry.
#[derive(Debug, Default)]
pub struct Registry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    config: FormatConfig,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(FormatConfig::new())
    }

    /// `config` applies to every logger this registry creates.
    pub fn with_config(config: FormatConfig) -> Self {
        Self {
            loggers: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Process-wide registry, created on first use and never torn down.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    fn loggers(&self) -> MutexGuard<'_, HashMap<String, Arc<Logger>>> {
        self.loggers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the cached logger for `name`, or creates one with a single
    /// console sink.
    ///
    /// NOTE: on a cache hit `level` and `json_format` are ignored. Asking for
    /// a different configuration of an existing name silently returns the
    /// logger as it was first built.
    pub fn get_or_create(&self, name: &str, level: Severity, json_format: bool) -> Arc<Logger> {
        let mut loggers = self.loggers();

        if let Some(logger) = loggers.get(name) {
            return Arc::clone(logger);
        }

        let logger = Arc::new(Logger::new(name, level, self.config.clone()));
        let formatter = Formatter::select(json_format, self.config.clone());
        logger.attach_sink(Sink::stderr(), formatter, None);

        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    /// Like [`Registry::get_or_create`], with the level given by name. An
    /// unknown level name fails before the cache is consulted.
    pub fn get_logger(&self, name: &str, level: &str, json_format: bool) -> Result<Arc<Logger>> {
        let level: Severity = level.parse()?;
        Ok(self.get_or_create(name, level, json_format))
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.loggers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers().is_empty()
    }
}
