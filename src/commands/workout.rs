use clap::{Args, Subcommand};
use std::io::{self, Write};

use super::OutputFormat;
use aitrainer::context::AppContext;
use aitrainer::models::Workout;

#[derive(Args)]
pub struct WorkoutCommand {
    #[command(subcommand)]
    pub command: WorkoutSubcommand,
}

#[derive(Subcommand)]
pub enum WorkoutSubcommand {
    /// List stored workouts
    List {
        /// Only workouts updated in the last N days
        #[arg(long)]
        days: Option<i64>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a workout's details
    Show {
        /// Workout ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a workout
    Delete {
        /// Workout ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl WorkoutCommand {
    pub async fn run(&self, context: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WorkoutSubcommand::List { days, format } => {
                let workouts = match days {
                    Some(days) if *days < 0 => {
                        return Err("--days must not be negative".into());
                    }
                    Some(days) => context.workouts.list_recent(*days).await?,
                    None => context.workouts.list().await?,
                };

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&workouts)?);
                    }
                    OutputFormat::Text => print_table(&workouts),
                }
            }
            WorkoutSubcommand::Show { id, format } => {
                let workout = context
                    .workouts
                    .get(id)
                    .await?
                    .ok_or_else(|| format!("Workout not found: {}", id))?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&workout)?);
                    }
                    OutputFormat::Text => print!("{}", workout),
                }
            }
            WorkoutSubcommand::Delete { id, force } => {
                if context.workouts.get(id).await?.is_none() {
                    return Err(format!("Workout not found: {}", id).into());
                }

                if !force {
                    print!("Delete workout {}? [y/N] ", id);
                    io::stdout().flush()?;
                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;
                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }

                context.workouts.delete(id).await?;
                println!("Deleted workout {}", id);
            }
        }
        Ok(())
    }
}

fn print_table(workouts: &[Workout]) {
    if workouts.is_empty() {
        println!("No workouts found.");
        return;
    }

    println!("{:<38} {:<17} {:>9}", "ID", "DATE", "EXERCISES");
    println!("{}", "-".repeat(66));
    for workout in workouts {
        println!(
            "{:<38} {:<17} {:>9}",
            workout.id.as_deref().unwrap_or("-"),
            workout.date.format("%Y-%m-%d %H:%M"),
            workout.exercises.len()
        );
    }
}
