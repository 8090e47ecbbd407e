//! Time-of-day reminders.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// What the reminder is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    #[default]
    Glucose,
    Medication,
    Meal,
    Exercise,
}

impl ReminderKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReminderKind::Glucose => "Medir Glicemia",
            ReminderKind::Medication => "Tomar Medicação",
            ReminderKind::Meal => "Refeição",
            ReminderKind::Exercise => "Exercício",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    /// HH:MM, 24-hour clock
    pub time: String,
    pub enabled: bool,
    pub message: String,
}

/// Request body for creating a reminder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderRequest {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ReminderKind,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl CreateReminderRequest {
    /// The notification text, defaulting to a template over the title.
    pub fn message_or_default(&self) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => default_message(self.title.trim()),
        }
    }
}

pub fn default_message(title: &str) -> String {
    format!("Lembrete: {}", title)
}

/// Parse an `HH:MM` time of day and return it normalized to two-digit fields.
pub fn normalize_time(raw: &str) -> Option<String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .ok()
        .map(|t| t.format("%H:%M").to_string())
}
