use chrono::{NaiveDateTime, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::line_item::TimeAdjustment;
use crate::domain::schedule::TimeBasedRule;

/// The winning rule for a pickup slot, ready to attach to a line item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAdjustment {
    pub rule_name: String,
    pub percentage: Decimal,
}

impl ResolvedAdjustment {
    pub fn into_time_adjustment(self) -> TimeAdjustment {
        TimeAdjustment { percentage: self.percentage, rule_name: Some(self.rule_name) }
    }
}

/// Selects at most one rule for a pickup time and day. Candidates are
/// expected to be pre-filtered by category/service-type scope
/// (`TimeBasedRule::applies_to`). Highest priority wins; on a tie the first
/// rule in input order wins. No match is a valid outcome, not an error: the
/// line keeps its base price.
pub fn resolve_adjustment(
    pickup_time: NaiveTime,
    pickup_day: Weekday,
    rules: &[TimeBasedRule],
) -> Option<ResolvedAdjustment> {
    let mut winner: Option<&TimeBasedRule> = None;

    for rule in rules {
        if !rule.is_active || !rule.matches_day(pickup_day) || !rule.matches_time(pickup_time) {
            continue;
        }
        // Strictly-greater replacement keeps the first rule on priority ties.
        match winner {
            Some(current) if rule.priority <= current.priority => {}
            _ => winner = Some(rule),
        }
    }

    winner.map(|rule| ResolvedAdjustment {
        rule_name: rule.name.clone(),
        percentage: rule.adjustment_percentage,
    })
}

/// Convenience wrapper for callers holding a full pickup timestamp.
pub fn resolve_adjustment_at(
    pickup: NaiveDateTime,
    rules: &[TimeBasedRule],
) -> Option<ResolvedAdjustment> {
    use chrono::{Datelike, Timelike};
    // Rules are defined to minute precision; drop seconds before matching.
    let time = pickup
        .time()
        .with_second(0)
        .and_then(|time| time.with_nanosecond(0))
        .unwrap_or_else(|| pickup.time());
    resolve_adjustment(time, pickup.weekday(), rules)
}
