//! Datastore API endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::{AppDocument, RevisionInfo};
use crate::AppState;

/// GET /api/datastore - The full application document.
pub async fn get_datastore(State(state): State<AppState>) -> ApiResult<AppDocument> {
    let committed = state.store.current().await;
    success(committed.document, committed.revision_id)
}

/// GET /api/datastore/revision - Get the current revision info.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_id = state.store.revision().await;

    let revision_info = state
        .repo
        .get_revision_info()
        .await
        .map_err(|e| e.with_revision(revision_id))?;

    success(revision_info.clone(), revision_info.revision_id)
}
