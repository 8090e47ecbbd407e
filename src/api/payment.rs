//! Simulated payment.

use axum::extract::State;

use super::{session_view, success, ApiResult, SessionView};
use crate::flow::screen_after_payment;
use crate::store::Action;
use crate::AppState;

/// POST /api/payment/confirm - Pretend to charge, then open the dashboard.
pub async fn confirm_payment(State(state): State<AppState>) -> ApiResult<SessionView> {
    let revision_id = state.store.revision().await;
    let pending = state
        .session
        .pending
        .payment
        .begin()
        .map_err(|e| e.with_revision(revision_id))?;

    tracing::info!("Processing payment");
    tokio::time::sleep(state.config.delays.payment).await;

    state
        .store
        .dispatch(Action::SetScreen(screen_after_payment()))
        .await
        .map_err(|e| e.with_revision(revision_id))?;
    drop(pending);

    let (view, revision_id) = session_view(&state).await;
    success(view, revision_id)
}
