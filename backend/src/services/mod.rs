//! Business logic services for the Siembra advisory server

pub mod dashboard;
pub mod history;
pub mod settings;

pub use dashboard::DashboardService;
pub use history::HistoryService;
pub use settings::SettingsStore;
