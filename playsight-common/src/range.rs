use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date-range filter applied to metric queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    /// Last 7 days.
    LastWeek,
    /// Last 30 days (default).
    #[default]
    LastMonth,
    /// Last 90 days.
    LastQuarter,
    /// Last 365 days.
    LastYear,
}

impl DateRange {
    /// All date-range options.
    pub const ALL: &'static [DateRange] = &[
        DateRange::LastWeek,
        DateRange::LastMonth,
        DateRange::LastQuarter,
        DateRange::LastYear,
    ];

    /// Number of days covered.
    pub fn days(&self) -> u64 {
        match self {
            DateRange::LastWeek => 7,
            DateRange::LastMonth => 30,
            DateRange::LastQuarter => 90,
            DateRange::LastYear => 365,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            DateRange::LastWeek => "7d",
            DateRange::LastMonth => "30d",
            DateRange::LastQuarter => "90d",
            DateRange::LastYear => "1y",
        }
    }

    /// Inclusive `(start, end)` dates ending at `today`.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = today
            .checked_sub_days(Days::new(self.days()))
            .unwrap_or(NaiveDate::MIN);
        (start, today)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
