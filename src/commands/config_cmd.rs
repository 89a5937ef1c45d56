use clap::{Args, Subcommand};

use super::OutputFormat;
use aitrainer::config::{Config, ConfigValue};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print_text(config),
                }
                Ok(())
            }
        }
    }
}

fn print_text(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    if let Some(path) = &config.config_file {
        println!("Config file: {}", path.display());
    } else {
        println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        );
    }
    println!();

    print_value("database_path", &config.database_path, |p| {
        p.display().to_string()
    });
    print_value("prompts_path", &config.prompts_path, |p| {
        p.display().to_string()
    });
    print_value("port", &config.port, u16::to_string);

    match &config.hevy_token {
        Some(token) => print_value("hevy_token", token, |_| "********".to_string()),
        None => {
            println!("hevy_token: (not set, sync disabled)");
            println!();
        }
    }
    print_value("hevy_base_url", &config.hevy_base_url, String::clone);
    print_value("sync_interval_hours", &config.sync_interval_hours, u64::to_string);
    print_value("openrouter_model", &config.openrouter_model, String::clone);
}

fn print_value<T>(key: &str, value: &ConfigValue<T>, show: impl Fn(&T) -> String) {
    println!("{}: {}", key, show(&value.value));
    println!("  source: {}", value.source);
    println!();
}
