use clap::Args;
use namedlog::Severity;

use super::DemoContext;

#[derive(Args, Debug, Default)]
pub struct Cmd {}

impl Cmd {
    pub fn run(&self, ctx: &DemoContext) -> eyre::Result<()> {
        println!("\n=== Basic Logging ===");

        let logger = ctx.registry.get_or_create("basic_example", ctx.level, ctx.json);

        logger.debug("This is a DEBUG message (hidden unless the level is DEBUG)")?;
        logger.info("This is an INFO message")?;
        logger.warning("This is a WARNING message")?;
        logger.error("This is an ERROR message")?;

        let debug_logger = ctx
            .registry
            .get_or_create("debug_example", Severity::Debug, ctx.json);
        debug_logger.debug("This DEBUG message shows because the logger level is DEBUG")?;
        debug_logger.info("This INFO message shows as well")?;

        Ok(())
    }
}
