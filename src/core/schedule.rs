use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::buckets::{best_key, group_by, BucketStats};
use crate::models::TradeSeries;

/// Weekday ordered Monday-first so ties resolve to the earlier day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hour-of-day and day-of-week attribution. Only a best bucket is reported.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub by_hour: BTreeMap<u32, BucketStats>,
    pub by_day: BTreeMap<DayOfWeek, BucketStats>,
    pub best_hour: Option<u32>,
    pub best_day: Option<DayOfWeek>,
}

impl ScheduleReport {
    pub fn from_deals(deals: &TradeSeries) -> Self {
        let by_hour = group_by(deals.iter(), |t| t.hour());
        let by_day = group_by(deals.iter(), |t| DayOfWeek::from(t.weekday()));
        Self {
            best_hour: best_key(&by_hour),
            best_day: best_key(&by_day),
            by_hour,
            by_day,
        }
    }
}
