//! Per-day summary.

use chrono::{FixedOffset, NaiveDate};

use super::{average, readings_on, tasks_on};
use crate::models::{iso_date, AppDocument, DailySummary, ProgressLevel};

const GOOD_FEEDBACK: &str = "Muito bem! Sua glicemia está bem controlada hoje.";
const MODERATE_FEEDBACK: &str =
    "Atenção: sua glicemia apresentou algumas elevações. Revise sua alimentação.";
const ATTENTION_FEEDBACK: &str =
    "Importante: glicemia elevada detectada. Consulte seu médico se persistir.";

/// Feedback and level for a day's average. A day without readings is neutral.
pub fn summary_feedback(average_glucose: f64) -> (ProgressLevel, &'static str) {
    if average_glucose <= 0.0 {
        (ProgressLevel::Good, "")
    } else if average_glucose < 140.0 {
        (ProgressLevel::Good, GOOD_FEEDBACK)
    } else if average_glucose < 180.0 {
        (ProgressLevel::Moderate, MODERATE_FEEDBACK)
    } else {
        (ProgressLevel::NeedsAttention, ATTENTION_FEEDBACK)
    }
}

/// Summarize the readings and checklist of `date`.
pub fn daily_summary(doc: &AppDocument, date: NaiveDate, offset: &FixedOffset) -> DailySummary {
    let key = iso_date(date);
    let readings = readings_on(&doc.glucose_readings, date, offset);
    let tasks = tasks_on(&doc.daily_tasks, &key);

    let average_glucose = average(&readings);
    let (progress_level, feedback) = summary_feedback(average_glucose);

    DailySummary {
        date: key,
        average_glucose,
        tasks_completed: tasks.iter().filter(|t| t.completed).count(),
        total_tasks: tasks.len(),
        feedback: feedback.to_string(),
        progress_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyTask, GlucoseReading, GlucoseUnit};
    use chrono::{TimeZone, Utc};

    fn doc_with(values: &[f64]) -> AppDocument {
        let mut doc = AppDocument::default();
        for (i, value) in values.iter().enumerate() {
            doc.glucose_readings.push(GlucoseReading {
                id: i.to_string(),
                value: *value,
                unit: GlucoseUnit::MgDl,
                timestamp: Utc.with_ymd_and_hms(2024, 5, 17, 8 + i as u32, 0, 0).unwrap(),
                notes: None,
            });
        }
        let mut tasks = DailyTask::defaults_for(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        tasks[0].completed = true;
        tasks[3].completed = true;
        doc.daily_tasks = tasks;
        doc
    }

    fn summarize(doc: &AppDocument) -> DailySummary {
        daily_summary(
            doc,
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            &FixedOffset::east_opt(0).unwrap(),
        )
    }

    #[test]
    fn test_summary_levels() {
        let good = summarize(&doc_with(&[100.0, 120.0]));
        assert_eq!(good.progress_level, ProgressLevel::Good);
        assert_eq!(good.average_glucose, 110.0);
        assert_eq!(good.tasks_completed, 2);
        assert_eq!(good.total_tasks, 5);
        assert_eq!(good.feedback, GOOD_FEEDBACK);

        let moderate = summarize(&doc_with(&[140.0]));
        assert_eq!(moderate.progress_level, ProgressLevel::Moderate);

        let attention = summarize(&doc_with(&[180.0, 200.0]));
        assert_eq!(attention.progress_level, ProgressLevel::NeedsAttention);
    }

    #[test]
    fn test_summary_without_readings() {
        let summary = summarize(&doc_with(&[]));
        assert_eq!(summary.average_glucose, 0.0);
        assert_eq!(summary.progress_level, ProgressLevel::Good);
        assert!(summary.feedback.is_empty());
        assert_eq!(summary.date, "2024-05-17");
    }
}
