//! Session endpoints: top-level screen and dashboard tab.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::flow::{DashboardTab, PendingStatus};
use crate::models::Screen;
use crate::store::Action;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabView {
    pub tab: DashboardTab,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub screen: Screen,
    pub active_tab: DashboardTab,
    pub tabs: Vec<TabView>,
    pub has_user: bool,
    pub pending: PendingStatus,
}

#[derive(Debug, Deserialize)]
pub struct SetScreenRequest {
    pub screen: Screen,
}

#[derive(Debug, Deserialize)]
pub struct SetTabRequest {
    pub tab: DashboardTab,
}

pub async fn session_view(state: &AppState) -> (SessionView, i64) {
    let committed = state.store.current().await;
    let view = SessionView {
        screen: committed.document.screen,
        active_tab: state.session.tab().await,
        tabs: DashboardTab::ALL
            .iter()
            .map(|tab| TabView {
                tab: *tab,
                label: tab.label(),
            })
            .collect(),
        has_user: committed.document.user.is_some(),
        pending: state.session.pending.status(),
    };
    (view, committed.revision_id)
}

/// GET /api/session - Current screen, tab and pending operations.
pub async fn get_session(State(state): State<AppState>) -> ApiResult<SessionView> {
    let (view, revision_id) = session_view(&state).await;
    success(view, revision_id)
}

/// PUT /api/session/screen - Switch the top-level screen.
pub async fn set_screen(
    State(state): State<AppState>,
    Json(request): Json<SetScreenRequest>,
) -> ApiResult<SessionView> {
    let revision_id = state.store.revision().await;

    state
        .store
        .dispatch(Action::SetScreen(request.screen))
        .await
        .map_err(|e| e.with_revision(revision_id))?;

    let (view, revision_id) = session_view(&state).await;
    success(view, revision_id)
}

/// PUT /api/session/tab - Select a dashboard tab.
pub async fn set_tab(
    State(state): State<AppState>,
    Json(request): Json<SetTabRequest>,
) -> ApiResult<SessionView> {
    state.session.set_tab(request.tab).await;
    tracing::debug!("Dashboard tab set to {:?}", request.tab);

    let (view, revision_id) = session_view(&state).await;
    success(view, revision_id)
}
