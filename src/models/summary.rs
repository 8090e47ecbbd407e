//! Derived per-day summary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressLevel {
    Good,
    Moderate,
    NeedsAttention,
}

/// Summary of one day's readings and checklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub average_glucose: f64,
    pub tasks_completed: usize,
    pub total_tasks: usize,
    pub feedback: String,
    pub progress_level: ProgressLevel,
}
