use clap::Args;

use super::DemoContext;

#[derive(Args, Debug, Default)]
pub struct Cmd {}

impl Cmd {
    pub fn run(&self, ctx: &DemoContext) -> eyre::Result<()> {
        println!("\n=== Multiple Loggers ===");

        let api = ctx.registry.get_or_create("api", ctx.level, ctx.json);
        let db = ctx.registry.get_or_create("database", ctx.level, ctx.json);
        let ui = ctx.registry.get_or_create("ui", ctx.level, ctx.json);

        api.info("API request received: GET /users/123")?;
        db.info("Executing query: SELECT * FROM users WHERE id = 123")?;
        db.info("Query returned 1 row")?;
        api.info("API request completed in 0.23s")?;
        ui.info("Rendering user profile page")?;

        println!("Registered loggers: {}", ctx.registry.names().join(", "));

        Ok(())
    }
}
