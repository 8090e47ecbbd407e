//! State transitions over the application document.
//!
//! `reduce` is the only place the document changes. It is pure and total:
//! every action yields a document, and actions that refer to something that
//! does not exist leave the document as it was.

use chrono::NaiveDate;

use crate::models::{
    iso_date, AppDocument, DailyTask, GlucoseReading, PartialDocument, Reminder, Screen, User,
};

/// Every mutation the application knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the user wholesale.
    SetUser(User),
    /// Switch the top-level screen. Prerequisites are not checked here.
    SetScreen(Screen),
    /// Append a reading; the caller assigns its id.
    AddGlucoseReading(GlucoseReading),
    /// Set the completion flag of the task with `id`.
    UpdateDailyTask { id: String, completed: bool },
    /// Append a reminder; the caller assigns its id.
    AddReminder(Reminder),
    /// Create the default checklist for `date` unless one exists.
    SeedDailyTasks { date: NaiveDate },
    /// Shallow-merge a partial document, used when hydrating from a snapshot.
    LoadState(PartialDocument),
}

impl Action {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetUser(_) => "SET_USER",
            Action::SetScreen(_) => "SET_SCREEN",
            Action::AddGlucoseReading(_) => "ADD_GLUCOSE_READING",
            Action::UpdateDailyTask { .. } => "UPDATE_DAILY_TASK",
            Action::AddReminder(_) => "ADD_REMINDER",
            Action::SeedDailyTasks { .. } => "SEED_DAILY_TASKS",
            Action::LoadState(_) => "LOAD_STATE",
        }
    }
}

/// Apply `action` to `state` and return the next document.
pub fn reduce(mut state: AppDocument, action: Action) -> AppDocument {
    match action {
        Action::SetUser(user) => {
            state.user = Some(user);
        }
        Action::SetScreen(screen) => {
            state.screen = screen;
        }
        Action::AddGlucoseReading(reading) => {
            state.glucose_readings.push(reading);
        }
        Action::UpdateDailyTask { id, completed } => {
            if let Some(task) = state.daily_tasks.iter_mut().find(|t| t.id == id) {
                task.completed = completed;
            }
        }
        Action::AddReminder(reminder) => {
            state.reminders.push(reminder);
        }
        Action::SeedDailyTasks { date } => {
            let key = iso_date(date);
            if !state.daily_tasks.iter().any(|t| t.date == key) {
                state.daily_tasks.extend(DailyTask::defaults_for(date));
            }
        }
        Action::LoadState(partial) => {
            if let Some(screen) = partial.screen {
                state.screen = screen;
            }
            if let Some(user) = partial.user {
                state.user = user;
            }
            if let Some(readings) = partial.glucose_readings {
                state.glucose_readings = readings;
            }
            if let Some(tasks) = partial.daily_tasks {
                state.daily_tasks = tasks;
            }
            if let Some(reminders) = partial.reminders {
                state.reminders = reminders;
            }
            if let Some(summaries) = partial.daily_summaries {
                state.daily_summaries = summaries;
            }
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiabetesType, ExperienceLevel, GlucoseUnit, ReminderKind};
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reading(id: &str, value: f64) -> GlucoseReading {
        GlucoseReading {
            id: id.to_string(),
            value,
            unit: GlucoseUnit::MgDl,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 17, 8, 0, 0).unwrap(),
            notes: None,
        }
    }

    fn user() -> User {
        User {
            id: "u".to_string(),
            email: "joao@example.com".to_string(),
            name: "João".to_string(),
            age: 50,
            diabetes_type: DiabetesType::Type1,
            challenges: vec![],
            medications: vec![],
            experience: ExperienceLevel::Advanced,
            has_access: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_set_user_and_screen() {
        let state = reduce(AppDocument::default(), Action::SetUser(user()));
        let state = reduce(state, Action::SetScreen(Screen::Dashboard));
        assert_eq!(state.user, Some(user()));
        assert_eq!(state.screen, Screen::Dashboard);
    }

    #[test]
    fn test_readings_append_in_order() {
        let state = reduce(AppDocument::default(), Action::AddGlucoseReading(reading("1", 90.0)));
        let state = reduce(state, Action::AddGlucoseReading(reading("2", 150.0)));
        let ids: Vec<&str> = state.glucose_readings.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_update_task_is_idempotent() {
        let seeded = reduce(
            AppDocument::default(),
            Action::SeedDailyTasks { date: date(2024, 5, 17) },
        );
        let toggle = Action::UpdateDailyTask {
            id: "exercise-2024-05-17".to_string(),
            completed: true,
        };

        let once = reduce(seeded.clone(), toggle.clone());
        let twice = reduce(once.clone(), toggle);
        assert_eq!(once, twice);
        assert!(once.daily_tasks[1].completed);
        assert_ne!(once, seeded);
    }

    #[test]
    fn test_update_unknown_task_is_noop() {
        let seeded = reduce(
            AppDocument::default(),
            Action::SeedDailyTasks { date: date(2024, 5, 17) },
        );
        let after = reduce(
            seeded.clone(),
            Action::UpdateDailyTask {
                id: "missing".to_string(),
                completed: true,
            },
        );
        assert_eq!(after, seeded);
    }

    #[test]
    fn test_seed_does_not_regenerate_existing_day() {
        let day = date(2024, 5, 17);
        let state = reduce(AppDocument::default(), Action::SeedDailyTasks { date: day });
        let state = reduce(
            state,
            Action::UpdateDailyTask {
                id: "glucose-2024-05-17".to_string(),
                completed: true,
            },
        );
        let reseeded = reduce(state.clone(), Action::SeedDailyTasks { date: day });
        assert_eq!(reseeded, state);
        assert_eq!(reseeded.daily_tasks.len(), 5);

        let next_day = reduce(reseeded, Action::SeedDailyTasks { date: date(2024, 5, 18) });
        assert_eq!(next_day.daily_tasks.len(), 10);
    }

    #[test]
    fn test_add_reminder_appends() {
        let reminder = Reminder {
            id: "r".to_string(),
            title: "Caminhada".to_string(),
            kind: ReminderKind::Exercise,
            time: "18:30".to_string(),
            enabled: true,
            message: "Lembrete: Caminhada".to_string(),
        };
        let state = reduce(AppDocument::default(), Action::AddReminder(reminder.clone()));
        assert_eq!(state.reminders, vec![reminder]);
    }

    #[test]
    fn test_load_state_merges_shallowly() {
        let current = reduce(AppDocument::default(), Action::SetUser(user()));
        let current = reduce(current, Action::AddGlucoseReading(reading("keep", 100.0)));

        let partial = PartialDocument {
            screen: Some(Screen::Payment),
            reminders: Some(vec![]),
            ..Default::default()
        };
        let merged = reduce(current.clone(), Action::LoadState(partial));

        assert_eq!(merged.screen, Screen::Payment);
        assert_eq!(merged.user, current.user);
        assert_eq!(merged.glucose_readings, current.glucose_readings);
    }

    #[test]
    fn test_load_full_document_replaces_everything() {
        let mut stored = AppDocument::default();
        stored.screen = Screen::Dashboard;
        stored.glucose_readings.push(reading("1", 65.0));

        let current = reduce(AppDocument::default(), Action::SetUser(user()));
        let merged = reduce(current, Action::LoadState(stored.clone().into()));
        assert_eq!(merged, stored);
    }
}
