//! Daily precipitation series from the forecast API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Index-aligned daily precipitation series.
///
/// One upstream request covers both the historical and the forward window:
/// entries `[0, past_days)` are history, entries `[past_days, ..)` are the
/// forecast. Consumers slice at that index rather than comparing dates,
/// because the upstream day zero may already be "today".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySeries {
    pub dates: Vec<NaiveDate>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub precipitation_probability_mean: Vec<Option<i32>>,
}

/// One forward-window day, ready for presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyOutlook {
    pub date: NaiveDate,
    pub rain_mm: f64,
    pub probability_percent: i32,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Accumulated rain over the historical slice, missing days counting 0.
    pub fn historical_total(&self, past_days: usize) -> f64 {
        self.precipitation_sum
            .iter()
            .take(past_days)
            .map(|v| v.unwrap_or(0.0))
            .sum()
    }

    /// Accumulated rain over the forward slice, missing days counting 0.
    pub fn forward_total(&self, past_days: usize) -> f64 {
        self.precipitation_sum
            .iter()
            .skip(past_days)
            .map(|v| v.unwrap_or(0.0))
            .sum()
    }

    /// The forward slice as per-day presentation entries.
    pub fn forward_outlook(&self, past_days: usize) -> Vec<DailyOutlook> {
        self.dates
            .iter()
            .skip(past_days)
            .zip(self.precipitation_sum.iter().skip(past_days))
            .zip(
                self.precipitation_probability_mean
                    .iter()
                    .skip(past_days),
            )
            .map(|((date, rain), prob)| DailyOutlook {
                date: *date,
                rain_mm: rain.unwrap_or(0.0),
                probability_percent: prob.unwrap_or(0),
            })
            .collect()
    }
}
