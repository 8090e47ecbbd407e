//! REST API module.
//!
//! Contains all API routes and handlers. Every handler answers with the
//! `{ success, data, revisionId }` envelope.

mod content;
mod datastore;
mod glucose;
mod home;
mod payment;
mod profile;
mod quiz;
mod records;
mod reminders;
mod session;
mod summaries;
mod tasks;

pub use content::*;
pub use datastore::*;
pub use glucose::*;
pub use home::*;
pub use payment::*;
pub use profile::*;
pub use quiz::*;
pub use records::*;
pub use reminders::*;
pub use session::*;
pub use summaries::*;
pub use tasks::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::stats::local_date;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Today's date in the configured offset.
fn today(state: &AppState) -> NaiveDate {
    local_date(Utc::now(), &state.config.utc_offset)
}
