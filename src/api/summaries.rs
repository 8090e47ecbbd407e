//! Daily summary endpoint.

use axum::extract::{Path, State};
use chrono::NaiveDate;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::DailySummary;
use crate::stats::daily_summary;
use crate::AppState;

/// GET /api/summaries/:date - Summary of one calendar day (YYYY-MM-DD).
pub async fn get_daily_summary(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<DailySummary> {
    let committed = state.store.current().await;

    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!("Invalid date {:?}, expected YYYY-MM-DD", date))
            .with_revision(committed.revision_id)
    })?;

    success(
        daily_summary(&committed.document, date, &state.config.utc_offset),
        committed.revision_id,
    )
}
