use std::{fmt, sync::Arc};

use serde_json::Value;
use tracing::{
    field::{Field, Visit},
    Event, Subscriber,
};
use tracing_subscriber::{layer::Context as LayerContext, Layer};

use super::{Context, Logger, Record, Severity};

/// Forwards `tracing` events into a [`Logger`]. The `message` field becomes
/// the record message, every other field lands in the record context.
pub struct LoggerLayer {
    logger: Arc<Logger>,
}

impl LoggerLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    context: Context,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.context.insert_value(field.name(), value.into());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.context.insert_value(field.name(), value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.context.insert_value(field.name(), value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.context.insert_value(field.name(), value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.context.insert_value(field.name(), value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.context
                .insert_value(field.name(), Value::String(format!("{:?}", value)));
        }
    }
}

impl<S: Subscriber> Layer<S> for LoggerLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let metadata = event.metadata();
        let severity = Severity::from(metadata.level());
        if !self.logger.is_enabled_for(severity) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let record = Record::new(severity, self.logger.name(), visitor.message)
            .at(metadata.file().unwrap_or("<unknown>"), metadata.line().unwrap_or(0))
            .with_context(visitor.context);

        if let Err(err) = self.logger.log_record(&record) {
            eprintln!("namedlog: failed writing tracing event: {}", err);
        }
    }
}
