//! Screen flow and transient UI state.
//!
//! The top-level screen lives in the persisted document. Everything here is
//! per-process: the dashboard tab, the onboarding wizard, the e-book reader
//! position and the pending flags are lost on restart, the same way the page
//! forgot them on reload.

pub mod pending;
pub mod quiz;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::content::ReaderPosition;
use crate::models::Screen;

pub use pending::{PendingOps, PendingStatus};
pub use quiz::{build_user, Advance, QuizDraftPatch, QuizView, QuizWizard, ToggleRequest};

/// Dashboard navigation tabs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTab {
    #[default]
    Home,
    Glucose,
    Ebook,
    Meals,
    Reminders,
    Records,
    Profile,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 7] = [
        DashboardTab::Home,
        DashboardTab::Glucose,
        DashboardTab::Ebook,
        DashboardTab::Meals,
        DashboardTab::Reminders,
        DashboardTab::Records,
        DashboardTab::Profile,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DashboardTab::Home => "Início",
            DashboardTab::Glucose => "Glicemia",
            DashboardTab::Ebook => "Ebook",
            DashboardTab::Meals => "Alimentação",
            DashboardTab::Reminders => "Lembretes",
            DashboardTab::Records => "Registros",
            DashboardTab::Profile => "Perfil",
        }
    }
}

/// Screen shown once the quiz is completed.
pub fn screen_after_quiz(admin: bool) -> Screen {
    if admin {
        Screen::Dashboard
    } else {
        Screen::Payment
    }
}

/// Screen shown once payment is confirmed.
pub fn screen_after_payment() -> Screen {
    Screen::Dashboard
}

/// Per-process UI state.
#[derive(Default)]
pub struct Session {
    tab: RwLock<DashboardTab>,
    pub quiz: Mutex<QuizWizard>,
    pub reader: RwLock<ReaderPosition>,
    pub pending: PendingOps,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn tab(&self) -> DashboardTab {
        *self.tab.read().await
    }

    pub async fn set_tab(&self, tab: DashboardTab) {
        *self.tab.write().await = tab;
    }
}
