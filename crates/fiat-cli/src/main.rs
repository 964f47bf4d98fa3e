use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use fiat_infrastructure::{ConfigService, FiatPaths};

mod app;
mod commands;
mod logging;

use commands::{
    auth::AuthCommand, confession::ConfessionCommand, journal::JournalCommand, mood::MoodCommand,
    truth::TruthCommand,
};

#[derive(Parser)]
#[command(name = "fiat")]
#[command(about = "Fiat - daily mood check-ins, journaling and confession planning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keep config and data under this directory instead of the platform defaults
    #[arg(long, global = true, env = "FIAT_HOME")]
    home: Option<PathBuf>,

    /// Show log output on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login(commands::auth::LoginArgs),
    /// Create an account
    Signup(commands::auth::SignupArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Daily mood check-ins
    #[command(subcommand)]
    Mood(MoodCommand),
    /// Journal entries
    #[command(subcommand)]
    Journal(JournalCommand),
    /// Confession planning
    #[command(subcommand)]
    Confession(ConfessionCommand),
    /// The shared truth board
    #[command(subcommand)]
    Truth(TruthCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let paths = FiatPaths::new(cli.home.as_deref())?;
    let config = ConfigService::new(&paths).get_config()?;
    let _log_guard = logging::init(&paths.log_dir(), config.log_level(), cli.verbose)?;
    tracing::debug!("Using config file {}", paths.config_file().display());

    let state = app::bootstrap(&paths, config).await?;

    match cli.command {
        Commands::Login(args) => commands::auth::run(&state, AuthCommand::Login(args)).await,
        Commands::Signup(args) => commands::auth::run(&state, AuthCommand::Signup(args)).await,
        Commands::Logout => commands::auth::run(&state, AuthCommand::Logout).await,
        Commands::Whoami => commands::auth::run(&state, AuthCommand::Whoami).await,
        Commands::Mood(cmd) => commands::mood::run(&state, cmd).await,
        Commands::Journal(cmd) => commands::journal::run(&state, cmd).await,
        Commands::Confession(cmd) => commands::confession::run(&state, cmd).await,
        Commands::Truth(cmd) => commands::truth::run(&state, cmd).await,
    }
}
