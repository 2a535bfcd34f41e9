//! Historical usage and daily preprocessing.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One raw usage observation (any granularity).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSample {
    pub at: DateTime<Utc>,
    pub usage: f64,
}

impl UsageSample {
    pub fn new(at: DateTime<Utc>, usage: f64) -> Self {
        Self { at, usage }
    }
}

/// Usage aggregated to a calendar day.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub usage: f64,
}

/// Resample raw samples to one value per day.
///
/// - Samples falling on the same UTC day are averaged.
/// - Non-finite samples are ignored.
/// - Days between the first and last observed day with no samples carry the
///   previous day's value forward.
///
/// The output is sorted by date and has no gaps.
pub fn preprocess_daily(samples: &[UsageSample]) -> Vec<DailyUsage> {
    let mut buckets: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for s in samples.iter().filter(|s| s.usage.is_finite()) {
        let entry = buckets.entry(s.at.date_naive()).or_insert((0.0, 0));
        entry.0 += s.usage;
        entry.1 += 1;
    }

    let (Some(first), Some(last)) = (
        buckets.keys().next().copied(),
        buckets.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(buckets.len());
    let mut carried = 0.0;
    let mut day = first;
    while day <= last {
        if let Some((sum, count)) = buckets.get(&day) {
            carried = sum / f64::from(*count);
        }
        out.push(DailyUsage {
            date: day,
            usage: carried,
        });
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn hourly_samples_resample_to_days() {
        let start = at(2024, 1, 1, 0);
        // 2024-01-01T00 .. 2024-01-10T23, hourly.
        let samples: Vec<UsageSample> = (0..240)
            .map(|h| UsageSample::new(start + Duration::hours(h), (h % 24) as f64))
            .collect();

        let daily = preprocess_daily(&samples);
        assert_eq!(daily.len(), 10);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(daily[9].date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        // mean of 0..=23
        assert!(daily.iter().all(|d| (d.usage - 11.5).abs() < 1e-9));
    }

    #[test]
    fn gaps_are_forward_filled() {
        let samples = vec![
            UsageSample::new(at(2024, 3, 1, 8), 10.0),
            UsageSample::new(at(2024, 3, 4, 8), 40.0),
        ];

        let daily = preprocess_daily(&samples);
        let usage: Vec<f64> = daily.iter().map(|d| d.usage).collect();
        assert_eq!(usage, vec![10.0, 10.0, 10.0, 40.0]);
    }

    #[test]
    fn unsorted_and_non_finite_samples() {
        let samples = vec![
            UsageSample::new(at(2024, 3, 2, 8), 20.0),
            UsageSample::new(at(2024, 3, 1, 8), f64::NAN),
            UsageSample::new(at(2024, 3, 1, 9), 5.0),
        ];

        let daily = preprocess_daily(&samples);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].usage, 5.0);
        assert_eq!(daily[1].usage, 20.0);
    }

    #[test]
    fn no_samples_means_no_days() {
        assert!(preprocess_daily(&[]).is_empty());
    }
}
