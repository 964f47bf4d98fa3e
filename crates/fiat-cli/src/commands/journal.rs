use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use fiat_core::journal::JournalEntry;

use super::local_time;
use crate::app::AppState;

#[derive(Subcommand)]
pub enum JournalCommand {
    /// List entries, newest first
    List,
    /// Write a new entry
    New {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: Option<String>,
    },
    /// Show one entry
    Show { id: String },
    /// Replace title and body of an entry
    Edit {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete an entry permanently
    Rm { id: String },
}

pub async fn run(state: &AppState, command: JournalCommand) -> Result<()> {
    let journal = &state.remote()?.journal;
    match command {
        JournalCommand::List => {
            let entries = journal.list().await?;
            if entries.is_empty() {
                println!("No journal entries yet");
            }
            for entry in &entries {
                println!(
                    "{}  {}  {}",
                    entry.id.to_string().dimmed(),
                    local_time(entry.created_at),
                    entry.title.bold()
                );
            }
        }
        JournalCommand::New { title, body } => {
            let entry = journal.create(&title, body.as_deref()).await?;
            println!("{} Created entry {}", "✓".green(), entry.id);
        }
        JournalCommand::Show { id } => print_entry(&journal.get(&id).await?),
        JournalCommand::Edit { id, title, body } => {
            let entry = journal.update(&id, &title, body.as_deref()).await?;
            println!("{} Updated entry {}", "✓".green(), entry.id);
        }
        JournalCommand::Rm { id } => {
            journal.delete(&id).await?;
            println!("{} Deleted entry {}", "✓".green(), id);
        }
    }
    Ok(())
}

fn print_entry(entry: &JournalEntry) {
    println!("{}", entry.title.bold());
    println!("{}", local_time(entry.created_at).dimmed());
    if let Some(body) = &entry.body {
        println!();
        println!("{body}");
    }
}
