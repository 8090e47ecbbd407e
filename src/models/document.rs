//! The application document: everything that is persisted in the snapshot.

use serde::{Deserialize, Serialize};

use super::{DailySummary, DailyTask, GlucoseReading, Reminder, User};

/// Top-level screen the application is showing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Quiz,
    Payment,
    Dashboard,
}

/// The root document containing all application data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppDocument {
    #[serde(rename = "currentStep")]
    pub screen: Screen,
    pub user: Option<User>,
    pub glucose_readings: Vec<GlucoseReading>,
    pub daily_tasks: Vec<DailyTask>,
    pub reminders: Vec<Reminder>,
    pub daily_summaries: Vec<DailySummary>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}

/// A document with every field optional, merged shallowly over the current one.
///
/// Unknown keys in a stored snapshot are ignored. An explicit `"user": null`
/// clears the user, while an absent `user` key leaves it alone.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialDocument {
    #[serde(default, rename = "currentStep")]
    pub screen: Option<Screen>,
    #[serde(default, deserialize_with = "present")]
    pub user: Option<Option<User>>,
    #[serde(default)]
    pub glucose_readings: Option<Vec<GlucoseReading>>,
    #[serde(default)]
    pub daily_tasks: Option<Vec<DailyTask>>,
    #[serde(default)]
    pub reminders: Option<Vec<Reminder>>,
    #[serde(default)]
    pub daily_summaries: Option<Vec<DailySummary>>,
}

/// Distinguish a key that is present (possibly null) from one that is missing.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<AppDocument> for PartialDocument {
    fn from(doc: AppDocument) -> Self {
        Self {
            screen: Some(doc.screen),
            user: Some(doc.user),
            glucose_readings: Some(doc.glucose_readings),
            daily_tasks: Some(doc.daily_tasks),
            reminders: Some(doc.reminders),
            daily_summaries: Some(doc.daily_summaries),
        }
    }
}
