//! PlaySight - Interactive dashboard for gaming analytics metrics.
//!
//! This library exposes the charting engine and UI components for testing.

pub mod app;
pub mod chart;
pub mod message;
pub mod mock;
pub mod source;
pub mod view;

// Re-export commonly used types
pub use app::{AppOptions, PlaySight};
pub use message::Message;
pub use source::MetricsSource;
