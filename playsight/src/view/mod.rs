//! View components for the PlaySight application.

pub mod dashboard;
pub mod formatting;
pub mod settings;
