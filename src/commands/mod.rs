mod config_cmd;
mod generate;
mod match_cmd;
mod settings;
mod sync_cmd;
mod workout;

pub use config_cmd::ConfigCommand;
pub use generate::GenerateCommand;
pub use match_cmd::MatchCommand;
pub use settings::SettingsCommand;
pub use sync_cmd::SyncCommand;
pub use workout::WorkoutCommand;

use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
