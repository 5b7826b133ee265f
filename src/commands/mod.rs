use std::{fmt::Display, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use eyre::Context;
use namedlog::{Builder, FormatConfig, Registry, Severity};

use crate::config::default_log_dir;

mod basic;
mod events;
mod file;
mod json;
mod multi;

#[derive(Subcommand, Debug)]
pub enum DemoCmd {
    /// Console logging at different levels.
    Basic(basic::Cmd),

    /// Console and file logging side by side.
    File(file::Cmd),

    /// JSON formatted records, with context and error details.
    Json(json::Cmd),

    /// Several named loggers for different components.
    Multi(multi::Cmd),

    /// `tracing` events routed into a named logger.
    Events(events::Cmd),

    /// Run every demonstration in order.
    All,
}

impl Display for DemoCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoCmd::Basic(_) => write!(f, "basic"),
            DemoCmd::File(_) => write!(f, "file"),
            DemoCmd::Json(_) => write!(f, "json"),
            DemoCmd::Multi(_) => write!(f, "multi"),
            DemoCmd::Events(_) => write!(f, "events"),
            DemoCmd::All => write!(f, "all"),
        }
    }
}

#[derive(Parser)]
#[command(version, long_version = "")]
#[command(
    about = "Demonstrates named, leveled loggers with console, file and JSON output.",
    long_about = None,
    disable_help_subcommand = true
)]
pub struct Demo {
    #[arg(
        global = true,
        long,
        default_value = "INFO",
        help = "Level for the demonstration loggers: DEBUG, INFO, WARNING, ERROR or CRITICAL.",
        display_order = 0
    )]
    pub level: Severity,

    #[arg(
        global = true,
        long,
        help = "Directory for log files. Defaults to $XDG_DATA_HOME/namedlog/logs.",
        display_order = 0
    )]
    pub log_dir: Option<PathBuf>,

    #[arg(
        global = true,
        long,
        help = "Render the demonstration loggers as JSON lines.",
        display_order = 1
    )]
    pub json: bool,

    #[arg(
        global = true,
        long,
        help = "Colour level names when stderr is a terminal.",
        display_order = 1
    )]
    pub color: bool,

    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        help = "Write diagnostics about the demo itself to stderr.",
        display_order = 999
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: DemoCmd,
}

/// Shared state handed to every demonstration.
pub struct DemoContext {
    pub registry: Registry,
    pub level: Severity,
    pub json: bool,
    pub log_dir: PathBuf,
}

impl Demo {
    fn diagnostics_level(&self) -> Option<Severity> {
        match self.verbose {
            0 => None,
            1 => Some(Severity::Error),
            2 => Some(Severity::Warning),
            3 => Some(Severity::Info),
            4_u8..=u8::MAX => Some(Severity::Debug),
        }
    }

    fn format_config(&self) -> FormatConfig {
        FormatConfig {
            use_ansi: self.color && yansi::Condition::stderr_is_tty(),
            ..FormatConfig::new()
        }
    }

    fn setup_logging(&self) -> eyre::Result<()> {
        let Some(level) = self.diagnostics_level() else {
            return Ok(());
        };

        let logger = Builder::new("namedlog")
            .with_level(level)
            .with_config(self.format_config())
            .with_stderr_sink()
            .build()?;

        Arc::new(logger)
            .install()
            .context("Failed registering diagnostics logger")
    }

    pub fn run(self) -> eyre::Result<()> {
        self.setup_logging()?;

        log::info!("namedlog demo starting");

        let ctx = DemoContext {
            registry: Registry::with_config(self.format_config()),
            level: self.level,
            json: self.json,
            log_dir: self.log_dir.clone().unwrap_or_else(default_log_dir),
        };

        log::info!("running demonstration {}", &self.cmd);
        log::debug!("log dir: {}", ctx.log_dir.display());

        let result = self.invoke_sub_command(&ctx);

        if let Err(msg) = &result {
            log::error!(
                "failed running demonstration {}, error={} cause={}",
                &self.cmd,
                msg,
                msg.root_cause()
            );
        }

        log::logger().flush();
        result
    }

    fn invoke_sub_command(&self, ctx: &DemoContext) -> eyre::Result<()> {
        match &self.cmd {
            DemoCmd::Basic(cmd) => cmd.run(ctx),
            DemoCmd::File(cmd) => cmd.run(ctx),
            DemoCmd::Json(cmd) => cmd.run(ctx),
            DemoCmd::Multi(cmd) => cmd.run(ctx),
            DemoCmd::Events(cmd) => cmd.run(ctx),
            DemoCmd::All => {
                basic::Cmd::default().run(ctx)?;
                file::Cmd::default().run(ctx)?;
                json::Cmd::default().run(ctx)?;
                multi::Cmd::default().run(ctx)?;
                events::Cmd::default().run(ctx)?;
                println!("\nAll demonstrations completed.");
                Ok(())
            }
        }
    }
}
