//! Checklist progress.

use serde::Serialize;

use crate::models::DailyTask;

/// Discrete completion band shown next to the checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistTier {
    Excellent,
    Good,
    Regular,
    NeedsImprovement,
}

impl ChecklistTier {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            ChecklistTier::Excellent
        } else if percentage >= 60.0 {
            ChecklistTier::Good
        } else if percentage >= 40.0 {
            ChecklistTier::Regular
        } else {
            ChecklistTier::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChecklistTier::Excellent => "Excelente",
            ChecklistTier::Good => "Bom",
            ChecklistTier::Regular => "Regular",
            ChecklistTier::NeedsImprovement => "Precisa melhorar",
        }
    }
}

/// Encouragement under the checklist. Nothing is shown before the first task is done.
pub fn checklist_message(percentage: f64) -> Option<&'static str> {
    if percentage <= 0.0 {
        None
    } else if percentage >= 80.0 {
        Some("🎉 Parabéns! Você está indo muito bem hoje!")
    } else if percentage >= 60.0 {
        Some("👍 Bom trabalho! Continue assim!")
    } else {
        Some("💪 Você consegue! Vamos completar mais tarefas!")
    }
}

/// Completion of the checklist for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub date: String,
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub tier: ChecklistTier,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Tasks belonging to `date`, in stored order.
pub fn tasks_on<'a>(tasks: &'a [DailyTask], date: &str) -> Vec<&'a DailyTask> {
    tasks.iter().filter(|t| t.date == date).collect()
}

pub fn task_progress(tasks: &[DailyTask], date: &str) -> TaskProgress {
    let todays = tasks_on(tasks, date);
    let total = todays.len();
    let completed = todays.iter().filter(|t| t.completed).count();
    let percentage = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    let tier = ChecklistTier::from_percentage(percentage);

    TaskProgress {
        date: date.to_string(),
        completed,
        total,
        percentage,
        tier,
        label: tier.label(),
        message: checklist_message(percentage),
    }
}
