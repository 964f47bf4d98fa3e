use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use fiat_core::truth::{ANONYMOUS, TruthPost};
use fiat_infrastructure::RealtimeFeed;
use tokio_util::sync::CancellationToken;

use super::local_time;
use crate::app::AppState;

#[derive(Subcommand)]
pub enum TruthCommand {
    /// Show the newest posts
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Share something on the board
    Post {
        text: String,
        /// Name to post under, defaults to your profile
        #[arg(long)]
        name: Option<String>,
    },
    /// Follow the board live until Ctrl-C
    Watch,
}

pub async fn run(state: &AppState, command: TruthCommand) -> Result<()> {
    let remote = state.remote()?;
    let board = &remote.truths;
    match command {
        TruthCommand::List { limit } => {
            let posts = board
                .list(limit.unwrap_or(state.config.limits.truth_list))
                .await?;
            print_posts(&posts);
        }
        TruthCommand::Post { text, name } => {
            let post = board.post(&text, name.as_deref()).await?;
            println!("{} Posted as {}", "✓".green(), post.author.as_deref().unwrap_or("-"));
        }
        TruthCommand::Watch => {
            print_posts(&board.list_latest().await?);

            let watch = board.watch(|listing| match listing {
                Ok(posts) => {
                    println!("{}", "── board updated ──".dimmed());
                    print_posts(&posts);
                }
                Err(err) => eprintln!("{} {}", "warning:".yellow().bold(), err),
            })?;

            // Join exactly the tables something is listening on.
            let cancel = CancellationToken::new();
            let feed = RealtimeFeed::new(
                remote.backend.clone(),
                remote.session_provider.context(),
                remote.change_hub.clone(),
            );
            let pump = feed.spawn(remote.change_hub.tables(), cancel.clone());
            println!("{}", "Watching for new posts, Ctrl-C to stop".dimmed());

            tokio::signal::ctrl_c().await?;
            watch.stop();
            cancel.cancel();
            if let Err(err) = pump.await {
                tracing::warn!("Realtime feed task ended abnormally: {}", err);
            }
        }
    }
    Ok(())
}

fn print_posts(posts: &[TruthPost]) {
    if posts.is_empty() {
        println!("The board is empty");
    }
    for post in posts {
        println!(
            "{} {}",
            post.author.as_deref().unwrap_or(ANONYMOUS).bold(),
            local_time(post.created_at).dimmed()
        );
        println!("  {}", post.text);
    }
}
