use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use fiat_core::date::format_date;
use fiat_core::mood::MoodEntry;

use super::{day_or_today, print_warnings, today};
use crate::app::AppState;

#[derive(Subcommand)]
pub enum MoodCommand {
    /// Record today's mood (1 = low, 5 = great)
    Save {
        score: i64,
        #[arg(long)]
        note: Option<String>,
        /// Day to record, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the mood recorded for a day
    Today {
        #[arg(long)]
        date: Option<String>,
    },
    /// Chart the recent trend
    Trend {
        /// Days to chart, defaults to `[limits] recent_moods`
        #[arg(long, value_enum)]
        range: Option<TrendRange>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TrendRange {
    #[value(name = "7")]
    Week,
    #[value(name = "30")]
    Month,
    #[value(name = "90")]
    Quarter,
}

impl TrendRange {
    pub fn days(self) -> usize {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }

    /// The shortest range spanning `days`, capped at the longest.
    pub fn covering(days: usize) -> Self {
        [Self::Week, Self::Month]
            .into_iter()
            .find(|range| range.days() >= days)
            .unwrap_or(Self::Quarter)
    }
}

pub async fn run(state: &AppState, command: MoodCommand) -> Result<()> {
    match command {
        MoodCommand::Save { score, note, date } => {
            let date = day_or_today(date.as_deref())?;
            let outcome = state
                .moods
                .save_today_mood(date, score, note.as_deref())
                .await?;
            println!("{} Saved {}", "✓".green(), describe(&outcome.record));
            print_warnings(&outcome.warnings);
        }
        MoodCommand::Today { date } => {
            let date = day_or_today(date.as_deref())?;
            match state.moods.get_today_mood(date).await? {
                Some(entry) => println!("{}", describe(&entry)),
                None => println!("No mood recorded for {}", format_date(date)),
            }
        }
        MoodCommand::Trend { range } => {
            let range =
                range.unwrap_or_else(|| TrendRange::covering(state.config.limits.recent_moods));
            let moods = state
                .moods
                .list_recent_moods_until(today(), range.days())
                .await?;
            if moods.is_empty() {
                println!("No moods in the last {} days", range.days());
            }
            for entry in &moods {
                println!("{}", trend_line(entry));
            }
        }
    }
    Ok(())
}

fn describe(entry: &MoodEntry) -> String {
    match &entry.note {
        Some(note) => format!("{}: {}/5 ({})", format_date(entry.date), entry.score, note),
        None => format!("{}: {}/5", format_date(entry.date), entry.score),
    }
}

fn trend_line(entry: &MoodEntry) -> String {
    let bar = "█".repeat(entry.score.value() as usize);
    format!("{} {:<5} {}", format_date(entry.date), bar, entry.score)
}
