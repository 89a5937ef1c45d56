//! Starting-weight suggestions for common barbell and dumbbell lifts.

use crate::models::SuggestedWeight;

/// Lift keyword and its suggested kg for beginner, intermediate, advanced.
///
/// Order matters: the first keyword contained in the exercise name wins.
const WEIGHT_TABLE: [(&str, [f64; 3]); 7] = [
    ("squat", [20.0, 40.0, 80.0]),
    ("deadlift", [30.0, 60.0, 120.0]),
    ("bench press", [20.0, 40.0, 80.0]),
    ("overhead press", [15.0, 30.0, 60.0]),
    ("barbell row", [20.0, 35.0, 70.0]),
    ("bicep curl", [8.0, 12.0, 20.0]),
    ("tricep extension", [8.0, 12.0, 20.0]),
];

fn level_column(fitness_level: &str) -> usize {
    match fitness_level.to_lowercase().as_str() {
        "intermediate" => 1,
        "advanced" => 2,
        _ => 0,
    }
}

/// Suggested weight for `exercise_name`, if it names a lift in the table.
///
/// Unknown fitness levels are treated as beginner.
pub fn suggest_weight(exercise_name: &str, fitness_level: &str) -> Option<SuggestedWeight> {
    let name = exercise_name.to_lowercase();
    let column = level_column(fitness_level);

    WEIGHT_TABLE
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, weights)| SuggestedWeight::kg(weights[column]))
}
