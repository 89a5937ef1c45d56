use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single workout session.
///
/// `id` is `None` until the workout is persisted. Workouts pulled from Hevy
/// keep the Hevy id so repeated pulls upsert the same row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default)]
    pub id: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}

impl Workout {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            date,
            exercises: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_exercises(mut self, exercises: Vec<ExerciseEntry>) -> Self {
        self.exercises = exercises;
        self
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("Workout {}", self.date.format("%Y-%m-%d %H:%M"));
        writeln!(f, "{}", title)?;
        writeln!(f, "{}", "=".repeat(title.len()))?;
        if let Some(id) = &self.id {
            writeln!(f, "ID: {}", id)?;
        }

        if !self.exercises.is_empty() {
            writeln!(f, "\nExercises:")?;
            for exercise in &self.exercises {
                write!(f, "  - {}", exercise.name.as_deref().unwrap_or("(unnamed)"))?;
                match &exercise.sets {
                    Some(Sets::Count(n)) => write!(f, " ({} sets)", n)?,
                    Some(Sets::Records(records)) => write!(f, " ({} sets)", records.len())?,
                    None => {}
                }
                if let Some(reps) = &exercise.reps {
                    match reps {
                        Value::String(s) => write!(f, " x {}", s)?,
                        other => write!(f, " x {}", other)?,
                    }
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

/// Either a plain set count or the full list of set records.
///
/// Set records are kept as raw JSON objects so whatever shape Hevy returns
/// (index, type, weight_kg, reps, ...) survives storage unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sets {
    Count(u32),
    Records(Vec<Value>),
}

/// Suggested starting weight for an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedWeight {
    pub weight: f64,
    pub unit: String,
}

impl SuggestedWeight {
    pub fn kg(weight: f64) -> Self {
        Self {
            weight,
            unit: "kg".to_string(),
        }
    }
}

/// One exercise inside a workout.
///
/// Only `name` is expected in practice; everything else is optional. Keys not
/// modelled here, and modelled keys whose value has another shape (such as
/// `"weight": "bodyweight"`), are preserved in `extra` under their own name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExerciseEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<Sets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_weight: Option<SuggestedWeight>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for ExerciseEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            name: take_typed(&mut extra, "name"),
            sets: take_typed(&mut extra, "sets"),
            reps: take_typed(&mut extra, "reps"),
            weight: take_typed(&mut extra, "weight"),
            rest: take_typed(&mut extra, "rest"),
            notes: take_typed(&mut extra, "notes"),
            template_id: take_typed(&mut extra, "template_id"),
            matched_name: take_typed(&mut extra, "matched_name"),
            suggested_weight: take_typed(&mut extra, "suggested_weight"),
            extra,
        })
    }
}

/// Moves `key` out of `map` if it decodes as `T`; otherwise leaves it there.
fn take_typed<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let typed = T::deserialize(map.get(key)?).ok()?;
    map.remove(key);
    Some(typed)
}

impl ExerciseEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_sets(mut self, sets: Sets) -> Self {
        self.sets = Some(sets);
        self
    }

    pub fn with_reps(mut self, reps: impl Into<Value>) -> Self {
        self.reps = Some(reps.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
