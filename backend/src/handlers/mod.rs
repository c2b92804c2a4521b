//! HTTP handlers for the Siembra advisory server

pub mod dashboard;
pub mod health;
pub mod history;
pub mod relay;
pub mod settings;
pub mod stations;

pub use dashboard::*;
pub use health::*;
pub use history::*;
pub use relay::*;
pub use settings::*;
pub use stations::*;
