//! Historical sowing-calendar service
//!
//! Serves the yearly rainfall calendar for the reforestation area and
//! exports it as CSV.

use shared::models::history::YearlyOutcome;

use crate::error::{AppError, AppResult};

/// Historical calendar service
#[derive(Clone, Default)]
pub struct HistoryService;

const MONTH_HEADERS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

impl HistoryService {
    pub fn new() -> Self {
        Self
    }

    /// Yearly rainfall outcomes for the monitored area, oldest first.
    pub fn calendar(&self) -> Vec<YearlyOutcome> {
        vec![
            YearlyOutcome::new(2013, 260.4, false),
            YearlyOutcome::new(2014, 155.4, false),
            YearlyOutcome::new(2015, 108.6, false),
            YearlyOutcome::new(2016, 297.8, false),
            YearlyOutcome::new(2017, 205.2, false),
            YearlyOutcome::new(2018, 382.6, false),
            YearlyOutcome::new(2019, 471.2, false),
            YearlyOutcome::new(2020, 258.4, false),
            YearlyOutcome::new(2021, 310.0, false),
            YearlyOutcome::new(2022, 374.0, false),
            YearlyOutcome::new(2023, 215.8, false),
            YearlyOutcome::new(2024, 166.4, false),
            YearlyOutcome::new(2025, 147.2, true),
        ]
    }

    /// Export the calendar as CSV.
    pub fn export_to_csv(&self, rows: &[YearlyOutcome]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        let mut header = vec!["year".to_string()];
        header.extend(MONTH_HEADERS.iter().map(|m| m.to_string()));
        header.push("total_mm".to_string());
        header.push("partial".to_string());
        wtr.write_record(&header)
            .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;

        for row in rows {
            let mut record = vec![row.year.to_string()];
            for month in &row.months {
                record.push(match month {
                    Some(level) => level.to_string(),
                    None => "N/D".to_string(),
                });
            }
            record.push(format!("{:.1}", row.total_mm));
            record.push(row.partial.to_string());
            wtr.write_record(&record)
                .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV finalize error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_covers_all_years() {
        let rows = HistoryService::new().calendar();
        assert_eq!(rows.len(), 13);
        assert_eq!(rows.first().unwrap().year, 2013);
        let last = rows.last().unwrap();
        assert_eq!(last.year, 2025);
        assert!(last.partial);
        assert_eq!(last.total_mm, 147.2);
    }

    #[test]
    fn test_export_to_csv() {
        let service = HistoryService::new();
        let csv = service.export_to_csv(&service.calendar()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "year,ene,feb,mar,abr,may,jun,jul,ago,sep,oct,nov,dic,total_mm,partial"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("2013,"));
        assert!(first.ends_with("260.4,false"));
        assert_eq!(csv.lines().count(), 14);
    }
}
