//! banter - command-line front end for the response engine.

mod commands;
mod source;
mod tokens;

use std::path::PathBuf;

use banter_core::BotConfig;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "banter", version, about = "Keyword-driven chat responder")]
struct Cli {
    /// Config file (.toml, .json, or .yaml). Environment variables are
    /// used when omitted.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Command to run. `banter help` lists all commands.
    command: String,

    /// Arguments passed to the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing. Logs go to stderr so command output stays clean.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BotConfig::from_file(path)?,
        None => BotConfig::from_env(),
    };
    debug!(bot_name = %config.bot_name, workbook = %config.workbook, "loaded configuration");

    let registry = commands::registry();
    let Some(command) = registry.get(cli.command.as_str()) else {
        anyhow::bail!(
            "unknown command '{}'. Available: {}",
            cli.command,
            registry.keys().copied().collect::<Vec<_>>().join(", ")
        );
    };

    let mut bot = commands::Bot::new(config)?;
    let output = (command.run)(&mut bot, &cli.args)?;
    println!("{output}");

    // Cooldowns and balances must survive across invocations.
    if let Some(parent) = bot.config.prefs_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    bot.prefs.save(&bot.config.prefs_path)?;

    Ok(())
}
