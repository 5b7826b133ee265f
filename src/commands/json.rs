use clap::Args;
use namedlog::{Context, Severity};

use super::DemoContext;

#[derive(Args, Debug, Default)]
pub struct Cmd {}

impl Cmd {
    pub fn run(&self, ctx: &DemoContext) -> eyre::Result<()> {
        println!("\n=== JSON Formatted Logging ===");

        let logger = ctx.registry.get_or_create("json_example", ctx.level, true);

        logger.info("This message is formatted as JSON")?;

        // Context travels with the record but is not part of the JSON line.
        let context = Context::new()
            .with("user_id", 12345)?
            .with("process_name", "data_import")?
            .with("status", "failed")?
            .with("elapsed_time", 0.125)?;
        logger.log_with(Severity::Warning, "Processing failed", context)?;

        if let Err(err) = "12a".parse::<u32>() {
            logger.exception("Could not parse the batch size", &err)?;
        }

        Ok(())
    }
}
