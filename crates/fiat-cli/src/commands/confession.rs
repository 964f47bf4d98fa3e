use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::Colorize;
use fiat_core::confession::{ConfessionRecord, ConfessionStatus};
use fiat_core::date::format_date;

use super::local_time;
use crate::app::AppState;

#[derive(Subcommand)]
pub enum ConfessionCommand {
    /// List planned and past confessions
    List,
    /// Plan a confession
    New {
        /// Planned day, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Examination notes
        #[arg(long)]
        notes: Option<String>,
    },
    Show { id: String },
    /// Change the supplied fields; an empty value clears one
    Edit {
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        before: Option<String>,
        #[arg(long)]
        after: Option<String>,
    },
    /// Mark as confessed
    Done {
        id: String,
        #[arg(long)]
        notes: Option<String>,
        /// When it happened (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    Rm { id: String },
}

pub async fn run(state: &AppState, command: ConfessionCommand) -> Result<()> {
    let confessions = &state.remote()?.confessions;
    match command {
        ConfessionCommand::List => {
            let records = confessions.list().await?;
            if records.is_empty() {
                println!("No confessions planned");
            }
            for record in &records {
                println!("{}", summary(record));
            }
        }
        ConfessionCommand::New { date, notes } => {
            let record = confessions.create(date.as_deref(), notes.as_deref()).await?;
            println!("{} Planned {}", "✓".green(), record.id);
        }
        ConfessionCommand::Show { id } => print_record(&confessions.get(&id).await?),
        ConfessionCommand::Edit {
            id,
            date,
            before,
            after,
        } => {
            let current = confessions.get(&id).await?;
            let fields = EditFields::merge(&current, date, before, after);
            let record = confessions
                .update(
                    &id,
                    fields.date.as_deref(),
                    fields.before.as_deref(),
                    fields.after.as_deref(),
                )
                .await?;
            println!("{} Updated {}", "✓".green(), record.id);
        }
        ConfessionCommand::Done { id, notes, at } => {
            let at = at.unwrap_or_else(Utc::now);
            let record = confessions.mark_confessed(&id, notes.as_deref(), at).await?;
            println!("{} Confessed {}", "✓".green(), local_time(at));
            if record.notes_after.is_some() {
                println!("  notes saved");
            }
        }
        ConfessionCommand::Rm { id } => {
            confessions.delete(&id).await?;
            println!("{} Deleted {}", "✓".green(), id);
        }
    }
    Ok(())
}

/// Editable fields of a record with the `edit` flags laid over them.
#[derive(Debug, PartialEq)]
struct EditFields {
    date: Option<String>,
    before: Option<String>,
    after: Option<String>,
}

impl EditFields {
    fn merge(
        current: &ConfessionRecord,
        date: Option<String>,
        before: Option<String>,
        after: Option<String>,
    ) -> Self {
        Self {
            date: date.or_else(|| current.planned_date.map(format_date)),
            before: before.or_else(|| current.notes_before.clone()),
            after: after.or_else(|| current.notes_after.clone()),
        }
    }
}

fn summary(record: &ConfessionRecord) -> String {
    let planned = record
        .planned_date
        .map(format_date)
        .unwrap_or_else(|| "unscheduled".to_string());
    let status = match record.status() {
        ConfessionStatus::Planned => "planned".yellow(),
        ConfessionStatus::Confessed => "confessed".green(),
    };
    format!("{}  {:<11}  {}", record.id.to_string().dimmed(), planned, status)
}

fn print_record(record: &ConfessionRecord) {
    println!("{}", summary(record));
    if let Some(notes) = &record.notes_before {
        println!("\n{}\n{notes}", "Before".bold());
    }
    if let Some(at) = record.confessed_at {
        println!("\nConfessed {}", local_time(at));
    }
    if let Some(notes) = &record.notes_after {
        println!("\n{}\n{notes}", "After".bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fiat_core::confession::parse_confession_id;

    fn planned() -> ConfessionRecord {
        ConfessionRecord {
            id: parse_confession_id("6f1c2b1e-5d0a-4c47-9a57-0c3f8f1c2d4e").unwrap(),
            planned_date: NaiveDate::from_ymd_opt(2025, 8, 16),
            notes_before: Some("examen".to_string()),
            confessed_at: None,
            notes_after: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_edit_keeps_fields_not_supplied() {
        let fields = EditFields::merge(&planned(), None, None, Some("peace".to_string()));
        assert_eq!(
            fields,
            EditFields {
                date: Some("2025-08-16".to_string()),
                before: Some("examen".to_string()),
                after: Some("peace".to_string()),
            }
        );
    }

    #[test]
    fn test_edit_with_empty_value_clears_field() {
        let fields = EditFields::merge(&planned(), Some(String::new()), None, None);
        assert_eq!(fields.date.as_deref(), Some(""));
        assert_eq!(fields.before.as_deref(), Some("examen"));
        assert_eq!(fields.after, None);
    }
}
