//! Calendar helpers: local dates, time windows and elapsed days.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Calendar date of `ts` in the configured offset.
pub fn local_date(ts: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    ts.with_timezone(offset).date_naive()
}

/// Hour of day (0-23) of `ts` in the configured offset.
pub fn local_hour(ts: DateTime<Utc>, offset: &FixedOffset) -> u32 {
    ts.with_timezone(offset).hour()
}

/// History window offered by the records view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Quarter => "quarter",
            TimeRange::Year => "year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Week => "Última Semana",
            TimeRange::Month => "Último Mês",
            TimeRange::Quarter => "Últimos 3 Meses",
            TimeRange::Year => "Último Ano",
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
        }
    }

    /// Parse a range tag; anything unknown selects the last week.
    pub fn parse_or_default(tag: Option<&str>) -> Self {
        tag.and_then(|t| Self::ALL.into_iter().find(|r| r.as_str() == t))
            .unwrap_or_default()
    }

    /// First instant included in the window ending at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }
}

/// Days the user has been signed up, rounded up. Direction is ignored.
pub fn days_since_signup(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - created_at).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Whole days elapsed since signup, rounded down and never negative.
pub fn whole_days_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_days().max(0)
}

/// Part of the day a greeting is chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            DayPeriod::Morning
        } else if hour < 18 {
            DayPeriod::Afternoon
        } else {
            DayPeriod::Evening
        }
    }
}

/// Welcome line for the home screen.
pub fn greeting(hour: u32, first_name: &str) -> String {
    match DayPeriod::from_hour(hour) {
        DayPeriod::Morning => format!("Bom dia, {}! Como está sua glicemia hoje?", first_name),
        DayPeriod::Afternoon => format!(
            "Boa tarde, {}! Lembre-se de manter seus registros em dia.",
            first_name
        ),
        DayPeriod::Evening => format!("Boa noite, {}! Como foi seu controle hoje?", first_name),
    }
}
