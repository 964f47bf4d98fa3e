use anyhow::Result;
use clap::Args;
use colored::Colorize;
use fiat_core::session::{AuthState, Credentials};

use crate::app::AppState;

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "FIAT_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args)]
pub struct SignupArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "FIAT_PASSWORD", hide_env_values = true)]
    password: String,
    /// Name shown on the truth board
    #[arg(long)]
    username: Option<String>,
}

pub enum AuthCommand {
    Login(LoginArgs),
    Signup(SignupArgs),
    Logout,
    Whoami,
}

pub async fn run(state: &AppState, command: AuthCommand) -> Result<()> {
    let provider = &state.remote()?.session_provider;
    match command {
        AuthCommand::Login(args) => {
            let credentials = Credentials::new(&args.email, &args.password)?;
            let session = provider.sign_in(&credentials).await?;
            println!(
                "{} Signed in as {}",
                "✓".green(),
                session.user.profile_name().unwrap_or(session.user_id())
            );
        }
        AuthCommand::Signup(args) => {
            let credentials = Credentials::new(&args.email, &args.password)?;
            match provider.sign_up(&credentials, args.username.as_deref()).await? {
                Some(session) => println!(
                    "{} Account created, signed in as {}",
                    "✓".green(),
                    session.user.profile_name().unwrap_or(session.user_id())
                ),
                None => println!(
                    "Account created. Check {} for a confirmation link, then run `fiat login`.",
                    credentials.email
                ),
            }
        }
        AuthCommand::Logout => {
            provider.sign_out().await?;
            println!("Signed out");
        }
        AuthCommand::Whoami => match provider.state() {
            AuthState::Authenticated(session) => {
                let user = &session.user;
                println!("{}", user.profile_name().unwrap_or(&user.id).bold());
                if let Some(email) = &user.email {
                    println!("  email: {email}");
                }
                println!("  id:    {}", user.id);
                if let Some(expires) = session.expires_at {
                    println!("  token expires {}", super::local_time(expires));
                }
            }
            _ => println!("Not signed in"),
        },
    }
    Ok(())
}
