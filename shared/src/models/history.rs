//! Historical sowing-calendar models

use serde::{Deserialize, Serialize};

use crate::models::recommendation::RecommendationLevel;

/// One row of the historical calendar: a year of monthly window
/// assessments plus the accumulated rainfall total.
///
/// `months` always holds twelve entries (January first); a `None` month has
/// no recorded assessment and renders as "N/D".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyOutcome {
    pub year: i32,
    pub months: Vec<Option<RecommendationLevel>>,
    pub total_mm: f64,
    /// The year is still in progress and the total is partial.
    pub partial: bool,
}

impl YearlyOutcome {
    pub fn new(year: i32, total_mm: f64, partial: bool) -> Self {
        Self {
            year,
            months: vec![None; 12],
            total_mm,
            partial,
        }
    }
}
