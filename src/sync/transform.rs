//! Conversions between Hevy payloads and local workouts.

use serde_json::{json, Map, Value};

use crate::hevy::{HevyWorkout, RoutineExercise, RoutinePayload};
use crate::models::{ExerciseEntry, Sets, Workout};

const UNKNOWN_PULLED_NAME: &str = "Unknown";
const UNKNOWN_PUSHED_NAME: &str = "Unknown Exercise";

/// Builds the local copy of a Hevy workout, reusing the Hevy id.
pub fn workout_from_hevy(remote: &HevyWorkout) -> Workout {
    let exercises = remote
        .exercises
        .iter()
        .map(|exercise| {
            let name = exercise
                .exercise_template
                .as_ref()
                .and_then(|t| t.name.clone())
                .unwrap_or_else(|| UNKNOWN_PULLED_NAME.to_string());

            ExerciseEntry::named(name)
                .with_sets(Sets::Records(exercise.sets.clone()))
                .with_notes(exercise.notes.clone().unwrap_or_default())
        })
        .collect();

    Workout::new(remote.created_at)
        .with_id(remote.id.clone())
        .with_exercises(exercises)
}

/// Builds the routine submitted to Hevy for a local workout.
pub fn routine_from_workout(workout: &Workout) -> RoutinePayload {
    RoutinePayload {
        title: format!("Workout from {}", workout.date.format("%Y-%m-%d %H:%M")),
        exercises: workout.exercises.iter().map(routine_exercise).collect(),
        notes: format!(
            "Imported workout from AI Personal Trainer on {}",
            workout.date.to_rfc3339()
        ),
    }
}

fn routine_exercise(entry: &ExerciseEntry) -> RoutineExercise {
    let sets = match &entry.sets {
        Some(Sets::Records(records)) => records.clone(),
        Some(Sets::Count(count)) => {
            let reps = entry.reps.clone().unwrap_or_else(|| json!(1));
            let weight = entry.weight.filter(|w| *w > 0.0);
            (0..*count)
                .map(|_| {
                    let mut record = Map::new();
                    record.insert("reps".into(), reps.clone());
                    if let Some(weight) = weight {
                        record.insert("weight".into(), json!(weight));
                    }
                    Value::Object(record)
                })
                .collect()
        }
        None => Vec::new(),
    };

    RoutineExercise {
        name: entry
            .name
            .clone()
            .unwrap_or_else(|| UNKNOWN_PUSHED_NAME.to_string()),
        sets,
        notes: entry.notes.clone(),
    }
}
