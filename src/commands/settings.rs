use clap::{Args, Subcommand};

use super::OutputFormat;
use aitrainer::context::AppContext;
use aitrainer::models::{UserSettings, OPENROUTER_PROVIDER};

#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub command: SettingsSubcommand,
}

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show a user's settings (keys are masked)
    Show {
        /// User ID
        user: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Store an API key for a provider
    SetKey {
        /// User ID
        user: String,

        /// The key itself
        key: String,

        /// Provider name
        #[arg(long, default_value = OPENROUTER_PROVIDER)]
        provider: String,
    },

    /// Replace a user's fitness goals
    SetGoals {
        /// User ID
        user: String,

        /// Goals (can be repeated)
        #[arg(required = true)]
        goals: Vec<String>,
    },
}

impl SettingsCommand {
    pub async fn run(&self, context: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            SettingsSubcommand::Show { user, format } => {
                let settings = context
                    .settings
                    .get(user)
                    .await?
                    .ok_or_else(|| format!("No settings stored for user: {}", user))?;
                let providers: Vec<&String> = settings.api_keys.keys().collect();

                match format {
                    OutputFormat::Json => {
                        let view = serde_json::json!({
                            "user_id": settings.user_id,
                            "goals": settings.goals,
                            "api_keys": providers,
                        });
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    }
                    OutputFormat::Text => {
                        println!("User: {}", settings.user_id);
                        if settings.goals.is_empty() {
                            println!("Goals: (none)");
                        } else {
                            println!("Goals: {}", settings.goals.join(", "));
                        }
                        for provider in providers {
                            println!("API key: {} ********", provider);
                        }
                    }
                }
            }
            SettingsSubcommand::SetKey {
                user,
                key,
                provider,
            } => {
                let settings = load_or_new(context, user)
                    .await?
                    .with_api_key(provider.clone(), key.clone());
                context.settings.save(&settings).await?;
                println!("Stored {} key for {}", provider, user);
            }
            SettingsSubcommand::SetGoals { user, goals } => {
                let settings = load_or_new(context, user)
                    .await?
                    .with_goals(goals.clone());
                context.settings.save(&settings).await?;
                println!("Updated goals for {}", user);
            }
        }
        Ok(())
    }
}

async fn load_or_new(
    context: &AppContext,
    user: &str,
) -> Result<UserSettings, aitrainer::db::RepoError> {
    Ok(context
        .settings
        .get(user)
        .await?
        .unwrap_or_else(|| UserSettings::new(user)))
}
