use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Overrides, Settings};
use database::{ConnectionManager, PgConnectionManager};
use std::path::PathBuf;

/// The main entry point for the Fitness Center application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; every value has a default or comes from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::CheckDb(args) => handle_check_db(args).await,
        Commands::ShowConfig(args) => handle_show_config(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Member and workout session management over HTTP.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Open and close one database connection to verify the settings.
    CheckDb(ConfigArgs),
    /// Print the effective settings (password redacted).
    ShowConfig(ConfigArgs),
}

#[derive(Parser)]
struct ConfigArgs {
    /// Path to a TOML settings file. Defaults to `config.toml` if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct ServeArgs {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    overrides: Overrides,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<Settings> {
        configuration::load_settings(self.config.as_deref()).context("Failed to load settings")
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut settings = args.config.load()?;
    args.overrides.apply(&mut settings);
    settings.validate()?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = configuration::init_tracing(&settings.logging)?;
    tracing::info!(address = %settings.bind_address(), "Starting Fitness Center API.");

    web_server::run_server(settings).await
}

async fn handle_check_db(args: ConfigArgs) -> anyhow::Result<()> {
    let settings = args.load()?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    let manager = PgConnectionManager::from_settings(&settings.database)?;
    let conn = manager
        .acquire()
        .await
        .context("Could not connect to the database")?;
    conn.release().await?;

    println!(
        "Connected to database {:?} on {}:{} as {}.",
        manager.options().get_database().unwrap_or_default(),
        manager.options().get_host(),
        manager.options().get_port(),
        manager.options().get_username(),
    );
    Ok(())
}

fn handle_show_config(args: ConfigArgs) -> anyhow::Result<()> {
    let settings = args.load()?;
    println!("{settings:#?}");
    Ok(())
}
