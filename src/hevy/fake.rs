//! In-memory [`HevyApi`] used by unit tests.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{
    HevyApi, HevyError, HevyWorkout, RoutineFolderPayload, RoutinePayload, TemplatesPage,
    WorkoutsPage,
};
use crate::models::ExerciseTemplate;

#[derive(Default)]
pub(crate) struct FakeHevy {
    pub workouts: Mutex<Vec<HevyWorkout>>,
    pub templates: Mutex<Vec<ExerciseTemplate>>,
    pub routines: Mutex<Vec<RoutinePayload>>,
    pub folders: Mutex<Vec<RoutineFolderPayload>>,
    /// Routine titles that should be rejected with a 500.
    pub failing_titles: Mutex<Vec<String>>,
    pub fail_workouts: AtomicBool,
    /// Workout pages at or after this number answer 502; 0 disables.
    pub fail_workouts_from_page: AtomicU32,
    pub fail_templates: AtomicBool,
    pub omit_routine_id: AtomicBool,
    pub workout_calls: AtomicUsize,
    pub template_calls: AtomicUsize,
}

impl FakeHevy {
    pub fn with_templates(templates: Vec<ExerciseTemplate>) -> Self {
        let fake = Self::default();
        *fake.templates.lock().unwrap() = templates;
        fake
    }

    pub fn with_workouts(workouts: Vec<HevyWorkout>) -> Self {
        let fake = Self::default();
        *fake.workouts.lock().unwrap() = workouts;
        fake
    }

    fn server_error(path: &str) -> HevyError {
        HevyError::Status {
            url: format!("fake://{}", path),
            status: 500,
            body: "boom".into(),
        }
    }
}

fn page_slice<T: Clone>(items: &[T], page: u32, page_size: u32) -> Vec<T> {
    let start = (page.saturating_sub(1) as usize) * page_size as usize;
    items
        .iter()
        .skip(start)
        .take(page_size as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl HevyApi for FakeHevy {
    async fn list_workouts(&self, page: u32, page_size: u32) -> Result<WorkoutsPage, HevyError> {
        self.workout_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_workouts.load(Ordering::SeqCst) {
            return Err(Self::server_error("/v1/workouts"));
        }
        let failing_page = self.fail_workouts_from_page.load(Ordering::SeqCst);
        if failing_page != 0 && page >= failing_page {
            return Err(HevyError::Status {
                url: "fake:///v1/workouts".into(),
                status: 502,
                body: "bad gateway".into(),
            });
        }
        let workouts = page_slice(&self.workouts.lock().unwrap(), page, page_size);
        Ok(WorkoutsPage {
            page: Some(page),
            page_count: None,
            workouts,
        })
    }

    async fn list_exercise_templates(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<TemplatesPage, HevyError> {
        self.template_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_templates.load(Ordering::SeqCst) {
            return Err(Self::server_error("/v1/exercise_templates"));
        }
        let exercise_templates = page_slice(&self.templates.lock().unwrap(), page, page_size);
        Ok(TemplatesPage {
            page: Some(page),
            page_count: None,
            exercise_templates,
        })
    }

    async fn create_routine(&self, payload: &RoutinePayload) -> Result<Value, HevyError> {
        if self
            .failing_titles
            .lock()
            .unwrap()
            .iter()
            .any(|t| t == &payload.title)
        {
            return Err(Self::server_error("/v1/routines"));
        }
        let mut routines = self.routines.lock().unwrap();
        routines.push(payload.clone());
        if self.omit_routine_id.load(Ordering::SeqCst) {
            Ok(json!({"title": payload.title}))
        } else {
            Ok(json!({"id": format!("routine-{}", routines.len())}))
        }
    }

    async fn create_routine_folder(
        &self,
        payload: &RoutineFolderPayload,
    ) -> Result<Value, HevyError> {
        self.folders.lock().unwrap().push(payload.clone());
        Ok(json!({"id": 1, "title": payload.title}))
    }
}
