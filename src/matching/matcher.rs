use std::sync::Arc;

use super::cache::TemplateCache;
use super::similarity::ratio;
use crate::models::{ExerciseTemplate, MatchResult};

/// Minimum similarity for a catalog entry to count as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Resolves free-text exercise names to Hevy catalog entries.
#[derive(Clone)]
pub struct ExerciseMatcher {
    cache: Arc<TemplateCache>,
}

impl ExerciseMatcher {
    pub fn new(cache: Arc<TemplateCache>) -> Self {
        Self { cache }
    }

    /// Best catalog entry for `name`, or the "Other – Notes" fallback.
    ///
    /// Never fails: a catalog that cannot be loaded resolves to the
    /// fallback.
    pub async fn match_exercise(&self, name: &str, threshold: f64) -> MatchResult {
        if normalize(name).is_empty() {
            return MatchResult::fallback(name);
        }

        match self.cache.get_templates().await {
            Ok(templates) => best_match(name, &templates, threshold),
            Err(e) => {
                tracing::warn!(error = %e, exercise = name, "template lookup failed, using fallback");
                MatchResult::fallback(name)
            }
        }
    }

    pub async fn match_default(&self, name: &str) -> MatchResult {
        self.match_exercise(name, DEFAULT_THRESHOLD).await
    }
}

/// Picks the highest-scoring template; the first one wins on ties.
pub fn best_match(name: &str, templates: &[ExerciseTemplate], threshold: f64) -> MatchResult {
    let needle = normalize(name);
    if needle.is_empty() {
        return MatchResult::fallback(name);
    }

    let mut best: Option<&ExerciseTemplate> = None;
    let mut best_score = 0.0;

    for template in templates {
        let candidate = normalize(&template.name);
        if candidate.is_empty() {
            continue;
        }
        let score = ratio(&needle, &candidate);
        if score > best_score {
            best_score = score;
            best = Some(template);
        }
    }

    match best {
        Some(template) if best_score >= threshold => MatchResult::from_template(template),
        _ => MatchResult::fallback(name),
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::hevy::fake::FakeHevy;
    use std::sync::atomic::Ordering;

    fn catalog() -> Vec<ExerciseTemplate> {
        vec![
            ExerciseTemplate::new("t1", "Squat"),
            ExerciseTemplate::new("t2", "Bench Press"),
        ]
    }

    fn matcher_with(fake: Arc<FakeHevy>) -> ExerciseMatcher {
        let cache = TemplateCache::new(fake, Arc::new(SystemClock));
        ExerciseMatcher::new(Arc::new(cache))
    }

    #[tokio::test]
    async fn test_scenario_squat_and_jumping_jacks() {
        let matcher = matcher_with(Arc::new(FakeHevy::with_templates(catalog())));

        let squat = matcher.match_exercise("squat", 0.6).await;
        assert_eq!(
            squat,
            MatchResult {
                template_id: "t1".into(),
                name: "Squat".into()
            }
        );

        let jacks = matcher.match_exercise("Jumping Jacks", 0.6).await;
        assert_eq!(
            jacks,
            MatchResult {
                template_id: "other_notes".into(),
                name: "Other – Notes - Jumping Jacks".into()
            }
        );
    }

    #[test]
    fn test_verbatim_names_match_their_template() {
        let templates = vec![
            ExerciseTemplate::new("a", "Deadlift (Barbell)"),
            ExerciseTemplate::new("b", "Lat Pulldown (Cable)"),
            ExerciseTemplate::new("c", "Plank"),
        ];
        for template in &templates {
            let result = best_match(&template.name, &templates, 0.99);
            assert_eq!(result.template_id, template.id);
        }
    }

    #[tokio::test]
    async fn test_blank_names_fall_back_without_remote_call() {
        let fake = Arc::new(FakeHevy::with_templates(catalog()));
        let matcher = matcher_with(fake.clone());

        for name in ["", "   "] {
            for threshold in [0.0, 0.6, 1.0] {
                let result = matcher.match_exercise(name, threshold).await;
                assert!(result.is_fallback());
                assert_eq!(result.name, format!("Other – Notes - {}", name));
            }
        }
        assert_eq!(fake.template_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_catalog_falls_back() {
        assert!(best_match("Squat", &[], 0.0).is_fallback());
    }

    #[test]
    fn test_ties_go_to_first_template() {
        let templates = vec![
            ExerciseTemplate::new("first", "Curl"),
            ExerciseTemplate::new("second", "curl"),
            ExerciseTemplate::new("third", " CURL "),
        ];
        assert_eq!(best_match("curl", &templates, 0.6).template_id, "first");
    }

    #[test]
    fn test_threshold_boundaries() {
        let templates = catalog();

        // Threshold 0 accepts any template with some overlap
        assert_eq!(best_match("bench", &templates, 0.0).template_id, "t2");
        // but an all-zero catalog still falls back
        assert!(best_match("xyz", &templates, 0.0).is_fallback());

        // Threshold 1 accepts only exact names
        assert_eq!(best_match("  SQUAT ", &templates, 1.0).template_id, "t1");
        assert!(best_match("squats", &templates, 1.0).is_fallback());
    }

    #[test]
    fn test_nameless_templates_are_skipped() {
        let templates = vec![
            ExerciseTemplate::new("blank", ""),
            ExerciseTemplate::new("t1", "Squat"),
        ];
        assert_eq!(best_match("squat", &templates, 0.6).template_id, "t1");
    }

    #[tokio::test]
    async fn test_fetch_failure_never_raises() {
        let fake = Arc::new(FakeHevy::with_templates(catalog()));
        fake.fail_templates.store(true, Ordering::SeqCst);
        let matcher = matcher_with(fake);

        let result = matcher.match_default("Squat").await;
        assert_eq!(result, MatchResult::fallback("Squat"));
    }

    #[test]
    fn test_fallback_uses_original_casing() {
        let result = best_match("  Farmer's Walk ", &catalog(), 0.6);
        assert_eq!(result.name, "Other – Notes -   Farmer's Walk ");
    }
}
