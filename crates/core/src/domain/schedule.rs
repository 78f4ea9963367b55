use chrono::{NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeBasedRuleId(pub String);

/// A schedule-dependent percentage adjustment (surcharge or reduction) tied
/// to a time-of-day window and a day-of-week set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeBasedRule {
    pub id: TimeBasedRuleId,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Empty set means the rule applies on every day.
    #[serde(default)]
    pub days_of_week: Vec<Weekday>,
    pub adjustment_percentage: Decimal,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub service_type_id: Option<String>,
}

fn default_active() -> bool {
    true
}

impl TimeBasedRule {
    /// Caller-side scoping filter. A rule with no category or service-type
    /// binding applies everywhere.
    pub fn applies_to(&self, category_id: Option<&str>, service_type_id: Option<&str>) -> bool {
        if let Some(rule_category) = &self.category_id {
            if category_id != Some(rule_category.as_str()) {
                return false;
            }
        }
        if let Some(rule_service_type) = &self.service_type_id {
            if service_type_id != Some(rule_service_type.as_str()) {
                return false;
            }
        }
        true
    }

    pub fn matches_day(&self, day: Weekday) -> bool {
        self.days_of_week.is_empty() || self.days_of_week.contains(&day)
    }

    /// Window membership over `[start_time, end_time)`. An end before the
    /// start wraps past midnight; equal endpoints mean a full-day window.
    pub fn matches_time(&self, time: NaiveTime) -> bool {
        if self.start_time < self.end_time {
            time >= self.start_time && time < self.end_time
        } else if self.start_time > self.end_time {
            time >= self.start_time || time < self.end_time
        } else {
            true
        }
    }
}
