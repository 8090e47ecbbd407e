//! Onboarding quiz endpoints.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use super::{success, ApiResult};
use crate::flow::{
    build_user, screen_after_quiz, Advance, QuizDraftPatch, QuizView, ToggleRequest,
};
use crate::models::{Screen, User};
use crate::store::Action;
use crate::AppState;

/// Result of pressing "next".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAdvanceView {
    pub quiz: QuizView,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<Screen>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// GET /api/quiz - Wizard step and draft answers.
pub async fn get_quiz(State(state): State<AppState>) -> ApiResult<QuizView> {
    let revision_id = state.store.revision().await;
    let view = state.session.quiz.lock().await.view();
    success(view, revision_id)
}

/// PUT /api/quiz/draft - Update draft fields.
pub async fn update_quiz_draft(
    State(state): State<AppState>,
    Json(patch): Json<QuizDraftPatch>,
) -> ApiResult<QuizView> {
    let revision_id = state.store.revision().await;
    let mut quiz = state.session.quiz.lock().await;
    quiz.patch(patch);
    success(quiz.view(), revision_id)
}

/// POST /api/quiz/toggle - Toggle a challenge or medication.
pub async fn toggle_quiz_option(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> ApiResult<QuizView> {
    let revision_id = state.store.revision().await;
    let mut quiz = state.session.quiz.lock().await;
    quiz.toggle(request.field, &request.value)
        .map_err(|e| e.with_revision(revision_id))?;
    success(quiz.view(), revision_id)
}

/// POST /api/quiz/back - Return to the previous step.
pub async fn quiz_back(State(state): State<AppState>) -> ApiResult<QuizView> {
    let revision_id = state.store.revision().await;
    let mut quiz = state.session.quiz.lock().await;
    quiz.back();
    success(quiz.view(), revision_id)
}

/// POST /api/quiz/next - Advance, or create the user on the last step.
pub async fn quiz_next(State(state): State<AppState>) -> ApiResult<QuizAdvanceView> {
    let revision_id = state.store.revision().await;
    let mut quiz = state.session.quiz.lock().await;
    let before = quiz.clone();

    let draft = match quiz.advance().map_err(|e| e.with_revision(revision_id))? {
        Advance::Moved(_) => {
            return success(
                QuizAdvanceView {
                    quiz: quiz.view(),
                    completed: false,
                    screen: None,
                    user: None,
                },
                revision_id,
            );
        }
        Advance::Completed(draft) => draft,
    };

    let committed = async {
        let user = build_user(draft, &state.config.admin_email, Utc::now())?;
        let screen = screen_after_quiz(user.has_access);
        state
            .store
            .dispatch_all(vec![Action::SetUser(user), Action::SetScreen(screen)])
            .await
    }
    .await;

    match committed {
        Ok(committed) => {
            tracing::info!(
                "Quiz completed, moving to {:?}",
                committed.document.screen
            );
            success(
                QuizAdvanceView {
                    quiz: quiz.view(),
                    completed: true,
                    screen: Some(committed.document.screen),
                    user: committed.document.user,
                },
                committed.revision_id,
            )
        }
        Err(e) => {
            *quiz = before;
            Err(e.with_revision(revision_id))
        }
    }
}
