use clap::Args;

use aitrainer::context::AppContext;
use aitrainer::matching::DEFAULT_THRESHOLD;
use aitrainer::models::MatchResult;

/// Look up the Hevy template for an exercise name
#[derive(Args)]
pub struct MatchCommand {
    /// Exercise name as written in a workout
    name: String,

    /// Minimum similarity ratio (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
}

impl MatchCommand {
    pub async fn run(&self, context: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err("--threshold must be between 0.0 and 1.0".into());
        }

        let result = match &context.matcher {
            Some(matcher) => matcher.match_exercise(&self.name, self.threshold).await,
            None => {
                eprintln!("Hevy token not configured; using the fallback template.");
                MatchResult::fallback(&self.name)
            }
        };

        if result.is_fallback() {
            println!("No catalog match for '{}'", self.name);
        }
        println!("template_id: {}", result.template_id);
        println!("name:        {}", result.name);
        Ok(())
    }
}
