pub mod commands;
pub mod error;
pub mod insights;
pub mod model;
pub mod output;
pub mod progress;
pub mod store;
