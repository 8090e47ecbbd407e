//! Dashboard home screen.

use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use super::{success, today, ApiResult, ReadingView};
use crate::models::{iso_date, DEFAULT_TASKS};
use crate::stats::{greeting, local_hour, readings_on, recent, tasks_on, whole_days_since};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub readings_today: usize,
    pub tasks_completed_today: usize,
    pub total_tasks_today: usize,
    pub enabled_reminders: usize,
    pub days_of_control: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub greeting: String,
    pub first_name: String,
    pub quick_stats: QuickStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reading: Option<ReadingView>,
}

/// GET /api/home - Greeting and today's numbers.
pub async fn get_home(State(state): State<AppState>) -> ApiResult<HomeView> {
    let committed = state.store.current().await;
    let doc = &committed.document;
    let now = Utc::now();
    let date = today(&state);

    let first_name = doc
        .user
        .as_ref()
        .map(|u| u.first_name().to_string())
        .unwrap_or_else(|| "Usuário".to_string());

    let quick_stats = QuickStats {
        readings_today: readings_on(&doc.glucose_readings, date, &state.config.utc_offset).len(),
        tasks_completed_today: tasks_on(&doc.daily_tasks, &iso_date(date))
            .iter()
            .filter(|t| t.completed)
            .count(),
        total_tasks_today: DEFAULT_TASKS.len(),
        enabled_reminders: doc.reminders.iter().filter(|r| r.enabled).count(),
        days_of_control: doc
            .user
            .as_ref()
            .map(|u| whole_days_since(u.created_at, now))
            .unwrap_or(0),
    };

    success(
        HomeView {
            greeting: greeting(local_hour(now, &state.config.utc_offset), &first_name),
            first_name,
            quick_stats,
            last_reading: recent(&doc.glucose_readings, 1)
                .into_iter()
                .next()
                .map(ReadingView::from),
        },
        committed.revision_id,
    )
}
