use clap::Args;

use super::OutputFormat;
use aitrainer::context::AppContext;
use aitrainer::generate::{WorkoutConstraints, WorkoutOverrides, WorkoutRequest};

#[derive(Args)]
pub struct GenerateCommand {
    /// User whose settings hold the OpenRouter key
    #[arg(long)]
    user: String,

    /// Length in minutes (10-180)
    #[arg(long, default_value_t = 30)]
    duration: u32,

    /// Fitness level: beginner, intermediate or advanced
    #[arg(long, default_value = "beginner")]
    level: String,

    /// Goal (can be repeated)
    #[arg(long = "goal", value_name = "GOAL")]
    goals: Vec<String>,

    /// Available equipment (can be repeated)
    #[arg(long = "equipment", value_name = "ITEM")]
    equipment: Vec<String>,

    /// Exercise to include (can be repeated)
    #[arg(long = "include", value_name = "EXERCISE")]
    include: Vec<String>,

    /// Exercise to avoid (can be repeated)
    #[arg(long = "avoid", value_name = "EXERCISE")]
    avoid: Vec<String>,

    /// Body area to focus on (can be repeated)
    #[arg(long = "focus", value_name = "AREA")]
    focus: Vec<String>,

    /// Store the generated workout
    #[arg(long)]
    save: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl GenerateCommand {
    pub async fn run(&self, context: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
        let request = self.request();
        let mut workout = context.generator.generate(&request).await?;

        if self.save {
            let id = context.workouts.create(&workout).await?;
            workout.id = Some(id);
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&workout)?),
            OutputFormat::Text => {
                print!("{}", workout);
                if let Some(id) = &workout.id {
                    println!();
                    println!("Saved as {}", id);
                }
            }
        }
        Ok(())
    }

    fn request(&self) -> WorkoutRequest {
        let non_empty = |items: &Vec<String>| Some(items.clone()).filter(|v| !v.is_empty());
        let overrides = WorkoutOverrides {
            specific_exercises: non_empty(&self.include),
            avoid_exercises: non_empty(&self.avoid),
            focus_areas: non_empty(&self.focus),
        };

        WorkoutRequest {
            user_id: self.user.clone(),
            constraints: WorkoutConstraints {
                goals: self.goals.clone(),
                equipment: self.equipment.clone(),
                duration: self.duration,
                fitness_level: self.level.clone(),
            },
            overrides: Some(overrides).filter(|o| *o != WorkoutOverrides::default()),
        }
    }
}
