//! Turns free-form LLM workout text into exercise entries.
//!
//! A line that starts with `N.`, `**` or `#` opens a new exercise. Lines that
//! mention sets or reps update the current exercise's sets, reps and rest;
//! any other line is appended to its notes. Text before the first exercise
//! is ignored.

use crate::models::{ExerciseEntry, Sets};

const DEFAULT_SETS: u32 = 3;
const DEFAULT_REPS: &str = "8-12";
const DEFAULT_REST: &str = "60-90 seconds";

/// Rest units in the order they are tried at each position.
const REST_UNITS: [&str; 4] = ["seconds", "second", "mins", "min"];

struct Draft {
    name: String,
    sets: u32,
    reps: String,
    rest: String,
    notes: String,
}

impl Draft {
    fn new(name: String) -> Self {
        Self {
            name,
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS.to_string(),
            rest: DEFAULT_REST.to_string(),
            notes: String::new(),
        }
    }

    fn into_entry(self) -> ExerciseEntry {
        let mut entry = ExerciseEntry::named(self.name)
            .with_sets(Sets::Count(self.sets))
            .with_reps(self.reps)
            .with_notes(self.notes);
        entry.rest = Some(self.rest);
        entry
    }
}

/// Parses the model's reply. Never returns an empty list.
pub fn parse_workout_response(text: &str) -> Vec<ExerciseEntry> {
    let mut exercises = Vec::new();
    let mut current: Option<Draft> = None;

    for line in text.trim().lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if is_exercise_heading(line) {
            if let Some(done) = current.take() {
                exercises.push(done.into_entry());
            }
            current = Some(Draft::new(heading_name(line)));
            continue;
        }

        let Some(draft) = current.as_mut() else {
            continue;
        };

        let lower = line.to_lowercase();
        if lower.contains("sets") || lower.contains("reps") {
            if let Some(sets) = find_sets(line) {
                draft.sets = sets;
            }
            if let Some(reps) = find_reps(line) {
                draft.reps = reps;
            }
            if let Some(rest) = find_rest(line) {
                draft.rest = rest;
            }
        } else {
            if !draft.notes.is_empty() {
                draft.notes.push(' ');
            }
            draft.notes.push_str(line);
        }
    }

    if let Some(done) = current {
        exercises.push(done.into_entry());
    }

    if exercises.is_empty() {
        exercises.push(default_exercise());
    }
    exercises
}

fn default_exercise() -> ExerciseEntry {
    let mut entry = ExerciseEntry::named("Push-ups")
        .with_sets(Sets::Count(DEFAULT_SETS))
        .with_reps(DEFAULT_REPS)
        .with_notes("Bodyweight exercise");
    entry.rest = Some("60 seconds".to_string());
    entry
}

fn is_exercise_heading(line: &str) -> bool {
    line.starts_with("**") || line.starts_with('#') || numbered_prefix_len(line).is_some()
}

/// Length of a leading `N.` marker, if present.
fn numbered_prefix_len(line: &str) -> Option<usize> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    (digits > 0 && line.as_bytes().get(digits) == Some(&b'.')).then_some(digits + 1)
}

fn heading_name(line: &str) -> String {
    let name = match numbered_prefix_len(line) {
        Some(len) => line[len..].trim_start(),
        None => line,
    };
    let name = name.replace("**", "");
    name.trim_start_matches('#').trim().to_string()
}

/// `N sets` (or `N set`): the set count.
fn find_sets(line: &str) -> Option<u32> {
    let bytes = line.as_bytes();
    digit_runs(bytes).find_map(|(start, end)| {
        let after = skip_spaces(bytes, end);
        if starts_with_ignore_case(bytes, after, "set") {
            line[start..end].parse().ok()
        } else {
            None
        }
    })
}

/// `N reps` or `N-M reps`: the rep count or range, without the unit.
fn find_reps(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    digit_runs(bytes).find_map(|(start, end)| {
        number_ends(bytes, end)
            .into_iter()
            .find(|&num_end| starts_with_ignore_case(bytes, skip_spaces(bytes, num_end), "rep"))
            .map(|num_end| line[start..num_end].to_string())
    })
}

/// `N[-M] seconds|mins|...`: the rest period, unit included.
fn find_rest(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    digit_runs(bytes).find_map(|(start, end)| {
        number_ends(bytes, end).into_iter().find_map(|num_end| {
            let unit_start = skip_spaces(bytes, num_end);
            REST_UNITS
                .iter()
                .find(|unit| starts_with_ignore_case(bytes, unit_start, unit))
                .map(|unit| line[start..unit_start + unit.len()].to_string())
        })
    })
}

/// Maximal runs of ASCII digits as `(start, end)` byte ranges.
fn digit_runs(bytes: &[u8]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut i = 0;
    std::iter::from_fn(move || {
        while i < bytes.len() && !bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        Some((start, i))
    })
}

/// Possible ends of a number whose first digit run ends at `end`: the
/// `N-M` range first, then the bare `N`.
fn number_ends(bytes: &[u8], end: usize) -> Vec<usize> {
    let mut ends = Vec::with_capacity(2);
    if bytes.get(end) == Some(&b'-') {
        let range_end = end + 1 + bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if range_end > end + 1 {
            ends.push(range_end);
        }
    }
    ends.push(end);
    ends
}

fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn starts_with_ignore_case(bytes: &[u8], at: usize, word: &str) -> bool {
    bytes
        .get(at..at + word.len())
        .is_some_and(|slice| slice.eq_ignore_ascii_case(word.as_bytes()))
}
