//! Historical records and export.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{success, today, ApiResult, ReadingView};
use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::{iso_date, GlucoseReading};
use crate::stats::{
    daily_averages, glucose_stats, insights, readings_since, recent, task_progress,
    DailyAverage, GlucoseStats, Insights, TaskProgress, TimeRange,
};
use crate::AppState;

/// Daily averages shown, most recent days.
const DAILY_AVERAGE_DAYS: usize = 10;
/// Readings listed under the statistics.
const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeOption {
    pub range: TimeRange,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsView {
    pub range: TimeRange,
    pub range_label: &'static str,
    pub ranges: Vec<RangeOption>,
    pub stats: Option<GlucoseStats>,
    /// Average at or under the upper target, when there are readings
    pub average_within_goal: Option<bool>,
    pub daily_averages: Vec<DailyAverage>,
    pub history: Vec<ReadingView>,
    pub today_tasks: TaskProgress,
    pub insights: Insights,
}

/// The downloadable records file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsExport {
    pub glucose_readings: Vec<GlucoseReading>,
    pub time_range: TimeRange,
    pub export_date: String,
    pub stats: Option<GlucoseStats>,
}

/// GET /api/records?range= - Statistics for the selected period.
pub async fn get_records(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<RecordsView> {
    let committed = state.store.current().await;
    let doc = &committed.document;
    let range = TimeRange::parse_or_default(query.range.as_deref());

    let window = readings_since(&doc.glucose_readings, range.window_start(Utc::now()));
    let stats = glucose_stats(&window);

    let mut averages = daily_averages(&window, &state.config.utc_offset);
    let skip = averages.len().saturating_sub(DAILY_AVERAGE_DAYS);
    averages.drain(..skip);

    success(
        RecordsView {
            range,
            range_label: range.label(),
            ranges: TimeRange::ALL
                .iter()
                .map(|r| RangeOption {
                    range: *r,
                    label: r.label(),
                })
                .collect(),
            insights: insights(stats.as_ref()),
            average_within_goal: stats.as_ref().map(GlucoseStats::average_within_goal),
            stats,
            daily_averages: averages,
            history: recent(&window, HISTORY_LIMIT)
                .into_iter()
                .map(ReadingView::from)
                .collect(),
            today_tasks: task_progress(&doc.daily_tasks, &iso_date(today(&state))),
        },
        committed.revision_id,
    )
}

/// GET /api/records/export?range= - Readings of the period as a JSON file.
pub async fn export_records(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, AppErrorWithRevision> {
    let committed = state.store.current().await;
    let range = TimeRange::parse_or_default(query.range.as_deref());
    let now = Utc::now();

    let readings = readings_since(&committed.document.glucose_readings, range.window_start(now));
    let export = RecordsExport {
        stats: glucose_stats(&readings),
        glucose_readings: readings,
        time_range: range,
        export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let body = serde_json::to_string_pretty(&export)
        .map_err(|e| AppError::Internal(e.to_string()).with_revision(committed.revision_id))?;
    let filename = format!(
        "diabetes-records-{}-{}.json",
        range.as_str(),
        iso_date(today(&state))
    );

    tracing::info!(
        "Exporting {} readings as {}",
        export.glucose_readings.len(),
        filename
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}
