use clap::Args;
use namedlog::LoggerLayer;
use tracing_subscriber::layer::SubscriberExt;

use super::DemoContext;

#[derive(Args, Debug, Default)]
pub struct Cmd {}

impl Cmd {
    pub fn run(&self, ctx: &DemoContext) -> eyre::Result<()> {
        println!("\n=== Tracing Events ===");

        let logger = ctx.registry.get_or_create("events", ctx.level, ctx.json);
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(cache = "users", "cache lookup");
            tracing::info!(rows = 1, "query finished");
            tracing::warn!(retries = 3, "upstream slow to respond");
            tracing::error!("upstream gave up");
        });

        Ok(())
    }
}
