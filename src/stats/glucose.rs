//! Glucose classification and aggregates.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use super::local_date;
use crate::models::{iso_date, GlucoseReading, GlucoseUnit};

/// Lower bound of the target band, mg/dL.
pub const TARGET_LOW: f64 = 70.0;
/// Upper bound of the target band, mg/dL.
pub const TARGET_HIGH: f64 = 140.0;
/// Above this a reading is very high, mg/dL.
pub const VERY_HIGH: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlucoseStatus {
    Low,
    Normal,
    High,
    VeryHigh,
}

/// Classify a raw value in `unit`.
pub fn classify(value: f64, unit: GlucoseUnit) -> GlucoseStatus {
    classify_mg_dl(unit.to_mg_dl(value))
}

/// Classify a value already in mg/dL.
pub fn classify_mg_dl(mg_dl: f64) -> GlucoseStatus {
    if mg_dl < TARGET_LOW {
        GlucoseStatus::Low
    } else if mg_dl <= TARGET_HIGH {
        GlucoseStatus::Normal
    } else if mg_dl <= VERY_HIGH {
        GlucoseStatus::High
    } else {
        GlucoseStatus::VeryHigh
    }
}

pub fn in_target_range(mg_dl: f64) -> bool {
    (TARGET_LOW..=TARGET_HIGH).contains(&mg_dl)
}

/// Mean of all readings in mg/dL, or 0 when there are none.
pub fn average(readings: &[GlucoseReading]) -> f64 {
    if readings.is_empty() {
        return 0.0;
    }
    readings.iter().map(GlucoseReading::mg_dl).sum::<f64>() / readings.len() as f64
}

/// Share of readings inside the target band, as a percentage.
///
/// `None` means there is no data to judge.
pub fn percentage_in_range(readings: &[GlucoseReading]) -> Option<f64> {
    if readings.is_empty() {
        return None;
    }
    let in_range = readings.iter().filter(|r| in_target_range(r.mg_dl())).count();
    Some(in_range as f64 / readings.len() as f64 * 100.0)
}

/// Aggregate statistics over a set of readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub in_range: usize,
    pub percentage_in_range: f64,
    pub total: usize,
}

impl GlucoseStats {
    /// Whether the average sits at or below the upper target.
    pub fn average_within_goal(&self) -> bool {
        self.average <= TARGET_HIGH
    }
}

pub fn glucose_stats(readings: &[GlucoseReading]) -> Option<GlucoseStats> {
    let percentage_in_range = percentage_in_range(readings)?;
    let values: Vec<f64> = readings.iter().map(GlucoseReading::mg_dl).collect();

    Some(GlucoseStats {
        average: average(readings),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        in_range: values.iter().filter(|v| in_target_range(**v)).count(),
        percentage_in_range,
        total: values.len(),
    })
}

/// Mean and count of the readings taken on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAverage {
    pub date: String,
    pub average: f64,
    pub count: usize,
    pub status: GlucoseStatus,
}

/// Group readings by local calendar date, ascending by date.
pub fn daily_averages(readings: &[GlucoseReading], offset: &FixedOffset) -> Vec<DailyAverage> {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for reading in readings {
        let bucket = buckets
            .entry(local_date(reading.timestamp, offset))
            .or_insert((0.0, 0));
        bucket.0 += reading.mg_dl();
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(date, (sum, count))| {
            let average = sum / count as f64;
            DailyAverage {
                date: iso_date(date),
                average,
                count,
                status: classify_mg_dl(average),
            }
        })
        .collect()
}

/// Readings captured at or after `start`, in stored order.
pub fn readings_since(readings: &[GlucoseReading], start: DateTime<Utc>) -> Vec<GlucoseReading> {
    readings
        .iter()
        .filter(|r| r.timestamp >= start)
        .cloned()
        .collect()
}

/// Readings captured on `date` in the configured offset.
pub fn readings_on(
    readings: &[GlucoseReading],
    date: NaiveDate,
    offset: &FixedOffset,
) -> Vec<GlucoseReading> {
    readings
        .iter()
        .filter(|r| local_date(r.timestamp, offset) == date)
        .cloned()
        .collect()
}

/// The `limit` newest readings, newest first.
pub fn recent(readings: &[GlucoseReading], limit: usize) -> Vec<GlucoseReading> {
    let mut sorted = readings.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.truncate(limit);
    sorted
}
