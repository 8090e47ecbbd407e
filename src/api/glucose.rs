//! Glucose reading endpoints.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateReadingRequest, GlucoseReading};
use crate::stats::{average, classify, classify_mg_dl, in_target_range, recent, GlucoseStatus};
use crate::store::Action;
use crate::AppState;

/// Readings shown in the tracker list.
const RECENT_LIMIT: usize = 10;

/// A reading with its classification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingView {
    #[serde(flatten)]
    pub reading: GlucoseReading,
    pub status: GlucoseStatus,
    pub in_range: bool,
}

impl From<GlucoseReading> for ReadingView {
    fn from(reading: GlucoseReading) -> Self {
        Self {
            status: classify(reading.value, reading.unit),
            in_range: in_target_range(reading.mg_dl()),
            reading,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseOverview {
    pub recent: Vec<ReadingView>,
    /// Mean of every reading in mg/dL, 0 without readings
    pub average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_status: Option<GlucoseStatus>,
    pub total: usize,
}

/// GET /api/glucose - Newest readings and the running average.
pub async fn list_glucose(State(state): State<AppState>) -> ApiResult<GlucoseOverview> {
    let committed = state.store.current().await;
    let readings = &committed.document.glucose_readings;
    let avg = average(readings);

    success(
        GlucoseOverview {
            recent: recent(readings, RECENT_LIMIT)
                .into_iter()
                .map(ReadingView::from)
                .collect(),
            average: avg,
            average_status: (!readings.is_empty()).then(|| classify_mg_dl(avg)),
            total: readings.len(),
        },
        committed.revision_id,
    )
}

/// POST /api/glucose - Record a reading.
pub async fn add_glucose(
    State(state): State<AppState>,
    Json(request): Json<CreateReadingRequest>,
) -> ApiResult<ReadingView> {
    let revision_id = state.store.revision().await;
    let _pending = state
        .session
        .pending
        .reading
        .begin()
        .map_err(|e| e.with_revision(revision_id))?;

    let value = request.parsed_value().ok_or_else(|| {
        AppError::Validation("Glucose value must be a number".to_string()).with_revision(revision_id)
    })?;

    tokio::time::sleep(state.config.delays.submit).await;

    let reading = GlucoseReading {
        id: uuid::Uuid::now_v7().to_string(),
        value,
        unit: request.unit,
        timestamp: request.timestamp.unwrap_or_else(Utc::now),
        notes: request.cleaned_notes(),
    };

    let committed = state
        .store
        .dispatch(Action::AddGlucoseReading(reading.clone()))
        .await
        .map_err(|e| e.with_revision(revision_id))?;

    tracing::info!(
        "Recorded glucose reading {} {}",
        reading.value,
        reading.unit.as_str()
    );
    success(ReadingView::from(reading), committed.revision_id)
}
