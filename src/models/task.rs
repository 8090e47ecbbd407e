//! Daily checklist tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The fixed checklist kinds, in display order: (kind tag, display name).
pub const DEFAULT_TASKS: [(&str, &str); 5] = [
    ("glucose", "Mediu a glicemia"),
    ("exercise", "Fez atividade física"),
    ("meal-plan", "Seguiu o plano alimentar"),
    ("medication", "Tomou medicação"),
    ("sleep", "Dormiu bem / descansou"),
];

/// One checklist entry for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyTask {
    pub id: String,
    pub name: String,
    pub completed: bool,
    /// ISO calendar date (YYYY-MM-DD)
    pub date: String,
}

impl DailyTask {
    /// Identifier of the task of `kind` on `date`.
    pub fn task_id(kind: &str, date: &str) -> String {
        format!("{}-{}", kind, date)
    }

    /// The five incomplete default tasks for `date`.
    pub fn defaults_for(date: NaiveDate) -> Vec<DailyTask> {
        let date = iso_date(date);
        DEFAULT_TASKS
            .iter()
            .map(|(kind, name)| DailyTask {
                id: Self::task_id(kind, &date),
                name: (*name).to_string(),
                completed: false,
                date: date.clone(),
            })
            .collect()
    }
}

/// Format a date as the ISO string tasks are keyed by.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Request body for toggling a task.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaskRequest {
    pub completed: bool,
}
