//! Aggregates over reading history.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::reading::Reading;
use crate::tier::Thresholds;

/// Window of history the statistics cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    LastHour,
    #[default]
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastHour => "1h",
            Self::LastDay => "24h",
            Self::LastWeek => "7d",
            Self::LastMonth => "30d",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "1h" => Some(Self::LastHour),
            "24h" => Some(Self::LastDay),
            "7d" => Some(Self::LastWeek),
            "30d" => Some(Self::LastMonth),
            _ => None,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::LastHour => Duration::hours(1),
            Self::LastDay => Duration::hours(24),
            Self::LastWeek => Duration::days(7),
            Self::LastMonth => Duration::days(30),
        }
    }

    /// Earliest timestamp inside the window ending at `now`.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStats {
    pub count: usize,
    pub average: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    /// Readings above the critical threshold, danger readings included.
    pub critical_events: usize,
    pub danger_events: usize,
}

impl ReadingStats {
    pub fn compute(readings: &[Reading], thresholds: &Thresholds) -> Self {
        let values: Vec<f64> = readings.iter().map(|r| r.check_value).collect();
        let count = values.len();
        let (average, max, min) = if count == 0 {
            (None, None, None)
        } else {
            let sum: f64 = values.iter().sum();
            let max = values.iter().copied().fold(f64::MIN, f64::max);
            let min = values.iter().copied().fold(f64::MAX, f64::min);
            (Some(sum / count as f64), Some(max), Some(min))
        };

        Self {
            count,
            average,
            max,
            min,
            critical_events: values.iter().filter(|v| **v > thresholds.critical).count(),
            danger_events: values.iter().filter(|v| **v > thresholds.danger).count(),
        }
    }

    /// Stats over the readings that fall inside `range` ending at `now`.
    pub fn for_range(
        readings: &[Reading],
        thresholds: &Thresholds,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Self {
        let start = range.start(now);
        let in_range: Vec<Reading> = readings
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= now)
            .copied()
            .collect();
        Self::compute(&in_range, thresholds)
    }
}

/// Average concentration over one UTC calendar day.
pub fn daily_average(readings: &[Reading], day: NaiveDate) -> Option<f64> {
    let values: Vec<f64> = readings
        .iter()
        .filter(|r| r.timestamp.date_naive() == day)
        .map(|r| r.check_value)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Average concentration for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub average: f64,
}

/// Per-day averages for every UTC day that has readings, oldest first.
pub fn daily_averages(readings: &[Reading]) -> Vec<DailyAverage> {
    let mut days: Vec<NaiveDate> = readings.iter().map(|r| r.timestamp.date_naive()).collect();
    days.sort();
    days.dedup();
    days.into_iter()
        .filter_map(|date| daily_average(readings, date).map(|average| DailyAverage { date, average }))
        .collect()
}
