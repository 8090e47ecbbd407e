//! Profile endpoints.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    AppDocument, UpdateProfileRequest, User, CHALLENGE_OPTIONS, MEDICATION_OPTIONS,
};
use crate::stats::days_since_signup;
use crate::store::Action;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diabetes_type_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_label: Option<&'static str>,
    pub days_since_signup: i64,
    pub challenge_options: &'static [&'static str],
    pub medication_options: &'static [&'static str],
}

fn profile_view(doc: &AppDocument) -> ProfileView {
    let user = doc.user.clone();
    ProfileView {
        diabetes_type_label: user.as_ref().map(|u| u.diabetes_type.label()),
        experience_label: user.as_ref().map(|u| u.experience.label()),
        days_since_signup: user
            .as_ref()
            .map(|u| days_since_signup(u.created_at, Utc::now()))
            .unwrap_or(0),
        user,
        challenge_options: &CHALLENGE_OPTIONS,
        medication_options: &MEDICATION_OPTIONS,
    }
}

/// GET /api/profile - The user and how long they have used the app.
pub async fn get_profile(State(state): State<AppState>) -> ApiResult<ProfileView> {
    let committed = state.store.current().await;
    success(profile_view(&committed.document), committed.revision_id)
}

/// PUT /api/profile - Save profile edits.
pub async fn update_profile(
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<ProfileView> {
    let revision_id = state.store.revision().await;
    let _pending = state
        .session
        .pending
        .profile
        .begin()
        .map_err(|e| e.with_revision(revision_id))?;

    if state.store.snapshot().await.user.is_none() {
        return Err(
            AppError::NotFound("No user profile exists yet".to_string()).with_revision(revision_id)
        );
    }

    tokio::time::sleep(state.config.delays.profile).await;

    // Re-read after the delay so the edit applies to the latest user.
    let Some(user) = state.store.snapshot().await.user else {
        return Err(
            AppError::NotFound("No user profile exists yet".to_string()).with_revision(revision_id)
        );
    };

    let committed = state
        .store
        .dispatch(Action::SetUser(request.apply(&user)))
        .await
        .map_err(|e| e.with_revision(revision_id))?;

    tracing::info!("Profile updated");
    success(profile_view(&committed.document), committed.revision_id)
}
