//! Time-boxed cache of the Hevy exercise-template catalog.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::hevy::{HevyApi, HevyError};
use crate::models::ExerciseTemplate;

/// How long a fetched catalog stays valid.
pub const DEFAULT_TTL_SECS: i64 = 3600;
/// Templates requested per page when refreshing.
pub const TEMPLATE_PAGE_SIZE: u32 = 100;

struct CachedCatalog {
    templates: Arc<Vec<ExerciseTemplate>>,
    fetched_at: DateTime<Utc>,
}

/// Holds the full template catalog with a single expiry.
///
/// The catalog is replaced as a whole; there is no per-entry invalidation.
/// Callers share one lock, so concurrent misses trigger one refresh.
pub struct TemplateCache {
    api: Arc<dyn HevyApi>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    page_size: u32,
    entry: Mutex<Option<CachedCatalog>>,
}

impl TemplateCache {
    pub fn new(api: Arc<dyn HevyApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
            page_size: TEMPLATE_PAGE_SIZE,
            entry: Mutex::new(None),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Returns the catalog, refreshing it first if absent or expired.
    ///
    /// A failed refresh is returned to the caller and leaves the cache as it
    /// was.
    pub async fn get_templates(&self) -> Result<Arc<Vec<ExerciseTemplate>>, HevyError> {
        let mut entry = self.entry.lock().await;
        let now = self.clock.now();

        if let Some(cached) = entry.as_ref() {
            if now - cached.fetched_at < self.ttl {
                return Ok(Arc::clone(&cached.templates));
            }
        }

        let templates = Arc::new(self.fetch_all().await?);
        tracing::info!(count = templates.len(), "refreshed exercise template catalog");

        *entry = Some(CachedCatalog {
            templates: Arc::clone(&templates),
            fetched_at: now,
        });

        Ok(templates)
    }

    /// Drops the cached catalog so the next call refetches.
    pub async fn clear(&self) {
        *self.entry.lock().await = None;
    }

    async fn fetch_all(&self) -> Result<Vec<ExerciseTemplate>, HevyError> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let batch = self
                .api
                .list_exercise_templates(page, self.page_size)
                .await?
                .exercise_templates;

            if batch.is_empty() {
                break;
            }
            let short_page = batch.len() < self.page_size as usize;
            all.extend(batch);
            if short_page {
                break;
            }
            page += 1;
        }

        Ok(all)
    }
}
