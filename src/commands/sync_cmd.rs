//! Sync CLI commands for reconciling local workouts with Hevy.

use std::sync::Arc;

use clap::{Args, Subcommand};

use aitrainer::context::AppContext;
use aitrainer::sync::{run_background, SyncRun, SyncService};

/// Sync with Hevy
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Keep running, syncing on the configured interval until Ctrl-C
    #[arg(long)]
    watch: bool,

    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Show sync configuration
    Status,

    /// Push one stored workout to Hevy as a routine
    Push {
        /// Workout ID
        id: String,
    },
}

impl SyncCommand {
    pub async fn run(&self, context: &AppContext) -> Result<(), SyncCommandError> {
        let service = context.sync.clone().ok_or(SyncCommandError::NotConfigured)?;

        match &self.command {
            Some(SyncSubcommand::Status) => {
                self.status(&service);
                Ok(())
            }
            Some(SyncSubcommand::Push { id }) => {
                let routine_id = service.push_workout(id).await?;
                println!("Pushed workout {} as routine {}", id, routine_id);
                Ok(())
            }
            None if self.watch => {
                self.watch(service).await;
                Ok(())
            }
            None => {
                println!("Syncing with Hevy...");
                println!();
                print_run(&service.run_sync().await);
                Ok(())
            }
        }
    }

    async fn watch(&self, service: Arc<SyncService>) {
        let interval = service.settings().interval;
        println!(
            "Syncing every {:.1} hour(s). Press Ctrl-C to stop.",
            interval.as_secs_f64() / 3600.0
        );

        tokio::select! {
            _ = run_background(service, interval) => {}
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Stopped.");
            }
        }
    }

    fn status(&self, service: &SyncService) {
        let status = service.status();
        println!("Sync Configuration");
        println!("==================");
        println!();
        println!("Interval:  {:.1} hour(s)", status.interval_hours);
        match status.last_sync_time {
            Some(time) => println!("Last sync: {}", time.to_rfc3339()),
            None => println!("Last sync: never (this process)"),
        }
    }
}

fn print_run(run: &SyncRun) {
    let counts = format!(
        "{} fetched, {} created, {} updated, {} failed",
        run.pull.fetched, run.pull.created, run.pull.updated, run.pull.failed
    );
    if run.pull_success {
        println!("  ✓ pull: {}", counts);
    } else {
        println!(
            "  ✗ pull: {}",
            run.pull_error.as_deref().unwrap_or("unknown error")
        );
        if run.pull.fetched > 0 {
            println!("    stored before the error: {}", counts);
        }
    }

    if run.push_success {
        println!(
            "  ✓ push: {} workout{} sent",
            run.pushed_workout_count,
            if run.pushed_workout_count == 1 { "" } else { "s" }
        );
    } else {
        println!(
            "  ✗ push: {}",
            run.push_error.as_deref().unwrap_or("unknown error")
        );
    }

    println!();
    println!("Finished in {:.2}s.", run.duration_seconds);
}

/// Errors from sync commands
#[derive(Debug)]
pub enum SyncCommandError {
    NotConfigured,
    SyncError(aitrainer::sync::SyncError),
}

impl std::fmt::Display for SyncCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncCommandError::NotConfigured => write!(
                f,
                "Hevy sync is not configured. Set HEVY_TOKEN or hevy_token in the config file"
            ),
            SyncCommandError::SyncError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SyncCommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncCommandError::NotConfigured => None,
            SyncCommandError::SyncError(e) => Some(e),
        }
    }
}

impl From<aitrainer::sync::SyncError> for SyncCommandError {
    fn from(e: aitrainer::sync::SyncError) -> Self {
        SyncCommandError::SyncError(e)
    }
}
