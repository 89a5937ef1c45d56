//! Named prompt templates backed by a YAML file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{WorkoutConstraints, WorkoutOverrides};

/// Template used for single-workout generation.
pub const SINGLE_WORKOUT: &str = "single_workout";

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to read prompts file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse prompts file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Failed to save prompts file '{path}': {message}")]
    Save { path: String, message: String },

    #[error("Prompt library has no backing file")]
    NoBackingFile,
}

/// Prompt templates keyed by name.
///
/// The file is a flat YAML mapping of `name: template`.
#[derive(Debug, Clone, Default)]
pub struct PromptLibrary {
    path: Option<PathBuf>,
    prompts: BTreeMap<String, String>,
}

impl PromptLibrary {
    /// Loads the library from `path`. A missing file yields an empty library
    /// that will be created on the first save.
    pub fn load(path: &Path) -> Result<Self, PromptError> {
        let prompts = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|source| PromptError::Read {
                path: path.display().to_string(),
                source,
            })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_yaml::from_str(&contents).map_err(|source| PromptError::Parse {
                    path: path.display().to_string(),
                    source,
                })?
            }
        } else {
            tracing::warn!("Prompts file {} not found, starting empty", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            prompts,
        })
    }

    /// An in-memory library with no backing file.
    pub fn from_prompts<I, K, V>(prompts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            path: None,
            prompts: prompts
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.prompts.get(name).map(String::as_str)
    }

    pub fn names(&self) -> Vec<&str> {
        self.prompts.keys().map(String::as_str).collect()
    }

    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.prompts
    }

    /// Inserts or replaces a template, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, template: impl Into<String>) -> Option<String> {
        self.prompts.insert(name.into(), template.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.prompts.remove(name)
    }

    /// Writes the library back to its YAML file.
    pub fn save(&self) -> Result<(), PromptError> {
        let path = self.path.as_ref().ok_or(PromptError::NoBackingFile)?;
        let save_error = |message: String| PromptError::Save {
            path: path.display().to_string(),
            message,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| save_error(e.to_string()))?;
            }
        }

        let yaml = serde_yaml::to_string(&self.prompts).map_err(|e| save_error(e.to_string()))?;
        fs::write(path, yaml).map_err(|e| save_error(e.to_string()))
    }
}

/// Fills a workout template from the request constraints and appends the
/// override paragraphs.
pub fn build_workout_prompt(
    template: &str,
    constraints: &WorkoutConstraints,
    overrides: Option<&WorkoutOverrides>,
) -> String {
    let goals = join_or(&constraints.goals, "general fitness");
    let equipment = join_or(&constraints.equipment, "bodyweight only");

    let mut prompt = template
        .replace("{goals}", &goals)
        .replace("{equipment}", &equipment)
        .replace("{duration}", &constraints.duration.to_string())
        .replace("{fitness_level}", &constraints.fitness_level);

    if let Some(overrides) = overrides {
        let paragraphs = [
            (
                "Please include these specific exercises",
                &overrides.specific_exercises,
            ),
            ("Please avoid these exercises", &overrides.avoid_exercises),
            ("Focus on these body areas", &overrides.focus_areas),
        ];
        for (lead, items) in paragraphs {
            if let Some(items) = items.as_ref().filter(|items| !items.is_empty()) {
                prompt.push_str(&format!("\n\n{}: {}", lead, items.join(", ")));
            }
        }
    }

    prompt
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}
