//! Reminder endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{normalize_time, CreateReminderRequest, Reminder};
use crate::store::Action;
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderView {
    #[serde(flatten)]
    pub reminder: Reminder,
    pub type_label: &'static str,
}

impl From<Reminder> for ReminderView {
    fn from(reminder: Reminder) -> Self {
        Self {
            type_label: reminder.kind.label(),
            reminder,
        }
    }
}

/// GET /api/reminders - All reminders, earliest time of day first.
pub async fn list_reminders(State(state): State<AppState>) -> ApiResult<Vec<ReminderView>> {
    let committed = state.store.current().await;

    let mut reminders = committed.document.reminders;
    reminders.sort_by(|a, b| a.time.cmp(&b.time));

    success(
        reminders.into_iter().map(ReminderView::from).collect(),
        committed.revision_id,
    )
}

/// POST /api/reminders - Create a reminder.
pub async fn create_reminder(
    State(state): State<AppState>,
    Json(request): Json<CreateReminderRequest>,
) -> ApiResult<ReminderView> {
    let revision_id = state.store.revision().await;
    let _pending = state
        .session
        .pending
        .reminder
        .begin()
        .map_err(|e| e.with_revision(revision_id))?;

    let title = request.title.trim();
    if title.is_empty() {
        return Err(
            AppError::Validation("Title is required".to_string()).with_revision(revision_id)
        );
    }
    let time = normalize_time(&request.time).ok_or_else(|| {
        AppError::Validation("Time must be HH:MM".to_string()).with_revision(revision_id)
    })?;

    tokio::time::sleep(state.config.delays.submit).await;

    let reminder = Reminder {
        id: uuid::Uuid::now_v7().to_string(),
        title: title.to_string(),
        kind: request.kind,
        time,
        enabled: request.enabled,
        message: request.message_or_default(),
    };

    let committed = state
        .store
        .dispatch(Action::AddReminder(reminder.clone()))
        .await
        .map_err(|e| e.with_revision(revision_id))?;

    tracing::info!("Created reminder {:?} at {}", reminder.title, reminder.time);
    success(ReminderView::from(reminder), committed.revision_id)
}
