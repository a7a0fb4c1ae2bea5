use crate::errors::HabitError;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub u64);

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HabitId {
    type Err = HabitError;

    /// Ids arrive as path segments; anything that is not a number names no habit.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<u64>()
            .map(HabitId)
            .map_err(|_| HabitError::NotFound(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    /// Days marked done, keyed by `yyyy-MM-dd`. Only `true` values are ever stored.
    #[serde(default, deserialize_with = "completed_days")]
    pub completed: BTreeMap<String, bool>,
    /// Missing in some older records.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Habit {
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed.contains_key(&date_key(date))
    }

    /// Flips the completion mark for `date`; returns the new state.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        let key = date_key(date);
        if self.completed.remove(&key).is_some() {
            false
        } else {
            self.completed.insert(key, true);
            true
        }
    }

    /// Creation day in the local calendar, if known.
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at
            .map(|created| created.with_timezone(&Local).date_naive())
    }
}

fn completed_days<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut days = BTreeMap::<String, bool>::deserialize(deserializer)?;
    days.retain(|_, done| *done);
    Ok(days)
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(value: &str) -> Result<NaiveDate, HabitError> {
    NaiveDate::parse_from_str(value.trim(), DATE_KEY_FORMAT)
        .map_err(|_| HabitError::Validation(format!("date must be yyyy-MM-dd, got '{value}'")))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub completed: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportSummary {
    pub year: i32,
    pub month: u32,
    pub month_label: String,
    pub completed_count: u32,
    pub missed_count: u32,
    pub percentage: f64,
    pub leading_blanks: u32,
    pub calendar_days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayMark {
    pub date: String,
    pub weekday: String,
    pub day: u32,
    pub completed: bool,
    pub is_today: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub date: Option<String>,
}
