//! Daily checklist endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{success, today, ApiResult};
use crate::models::{iso_date, DailyTask, UpdateTaskRequest};
use crate::stats::{task_progress, tasks_on, TaskProgress};
use crate::store::{Action, Committed};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistView {
    pub date: String,
    pub tasks: Vec<DailyTask>,
    pub progress: TaskProgress,
}

fn checklist(committed: &Committed, date: &str) -> ChecklistView {
    let tasks = &committed.document.daily_tasks;
    ChecklistView {
        date: date.to_string(),
        tasks: tasks_on(tasks, date).into_iter().cloned().collect(),
        progress: task_progress(tasks, date),
    }
}

/// GET /api/tasks/today - Today's checklist, created on first visit.
pub async fn get_today_tasks(State(state): State<AppState>) -> ApiResult<ChecklistView> {
    let revision_id = state.store.revision().await;
    let date = today(&state);

    let committed = state
        .store
        .dispatch(Action::SeedDailyTasks { date })
        .await
        .map_err(|e| e.with_revision(revision_id))?;

    success(checklist(&committed, &iso_date(date)), committed.revision_id)
}

/// PUT /api/tasks/:id - Mark a task done or not done.
///
/// Unknown ids change nothing.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<ChecklistView> {
    let revision_id = state.store.revision().await;

    let committed = state
        .store
        .dispatch(Action::UpdateDailyTask {
            id: id.clone(),
            completed: request.completed,
        })
        .await
        .map_err(|e| e.with_revision(revision_id))?;

    let date = committed
        .document
        .daily_tasks
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.date.clone())
        .unwrap_or_else(|| iso_date(today(&state)));

    success(checklist(&committed, &date), committed.revision_id)
}
