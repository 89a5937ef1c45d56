use serde::{Deserialize, Serialize};

/// Template id used when no catalog entry matches.
pub const FALLBACK_TEMPLATE_ID: &str = "other_notes";
/// Display name prefix used when no catalog entry matches.
pub const FALLBACK_TEMPLATE_NAME: &str = "Other – Notes";

/// An exercise definition from the Hevy catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    #[serde(alias = "template_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl ExerciseTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The catalog entry an exercise name resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub template_id: String,
    pub name: String,
}

impl MatchResult {
    pub fn from_template(template: &ExerciseTemplate) -> Self {
        Self {
            template_id: template.id.clone(),
            name: template.name.clone(),
        }
    }

    /// The "Other – Notes" sentinel carrying the original name.
    pub fn fallback(original_name: &str) -> Self {
        Self {
            template_id: FALLBACK_TEMPLATE_ID.to_string(),
            name: format!("{} - {}", FALLBACK_TEMPLATE_NAME, original_name),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.template_id == FALLBACK_TEMPLATE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_keeps_original_name() {
        let result = MatchResult::fallback("Jumping Jacks");
        assert_eq!(result.template_id, "other_notes");
        assert_eq!(result.name, "Other – Notes - Jumping Jacks");
        assert!(result.is_fallback());
    }

    #[test]
    fn test_template_accepts_template_id_alias() {
        let template: ExerciseTemplate =
            serde_json::from_value(json!({"template_id": "abc", "name": "Deadlift"})).unwrap();
        assert_eq!(template.id, "abc");

        let nameless: ExerciseTemplate = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(nameless.name, "");
    }
}
