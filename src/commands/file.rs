use clap::Args;
use eyre::Context;
use namedlog::Severity;

use super::DemoContext;

#[derive(Args, Debug, Default)]
pub struct Cmd {}

impl Cmd {
    pub fn run(&self, ctx: &DemoContext) -> eyre::Result<()> {
        println!("\n=== File Logging ===");

        let log_file = ctx.log_dir.join("example.log");

        let logger = ctx
            .registry
            .get_or_create("file_example", Severity::Debug, ctx.json);
        namedlog::attach_file_sink(&logger, &log_file, Some(Severity::Debug), ctx.json)
            .wrap_err("Failed attaching file sink")?;

        logger.debug("Debug message, written to console and file")?;
        logger.info("Info message, written to console and file")?;
        logger.warning("Warning message, written to console and file")?;

        let contents = std::fs::read_to_string(&log_file)
            .with_context(|| format!("Failed reading log file {}", log_file.display()))?;

        println!("\nLog file at: {}", log_file.display());
        println!("Log file contents:");
        print!("{}", contents);

        Ok(())
    }
}
