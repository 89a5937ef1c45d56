use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A multi-week plan made of workout descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    #[serde(default)]
    pub id: Option<String>,
    pub start_date: DateTime<Utc>,
    pub weeks: u32,
    #[serde(default)]
    pub workouts: Vec<Value>,
}

impl WorkoutPlan {
    /// Creates a plan. `weeks` must be at least 1.
    pub fn new(start_date: DateTime<Utc>, weeks: u32) -> Result<Self, String> {
        if weeks < 1 {
            return Err("A workout plan must span at least one week".to_string());
        }
        Ok(Self {
            id: None,
            start_date,
            weeks,
            workouts: Vec::new(),
        })
    }

    pub fn with_workouts(mut self, workouts: Vec<Value>) -> Self {
        self.workouts = workouts;
        self
    }
}
