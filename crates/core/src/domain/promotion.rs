use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// A globally defined, code-driven discount rule. Eligibility (active flag
/// and date window) is evaluated by the caller before pricing; the engine
/// only sees the arithmetic fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub code: String,
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub minimum_amount: Option<Decimal>,
    #[serde(default)]
    pub maximum_discount: Option<Decimal>,
}

fn default_active() -> bool {
    true
}

impl Promotion {
    /// Caller-side eligibility gate. An ineligible promotion must be dropped
    /// from the request (contributes 0), never passed through as an error.
    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(start) = self.start_date {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if now > end {
                return false;
            }
        }
        true
    }

    /// Discount contributed against a given base total. Percentage and fixed
    /// discounts are both clamped to the base; a configured maximum caps the
    /// percentage result. Below `minimum_amount` the promotion contributes
    /// zero silently.
    pub fn discount_for(&self, base_total: Decimal) -> Decimal {
        if let Some(minimum) = self.minimum_amount {
            if base_total < minimum {
                return Decimal::ZERO;
            }
        }

        let raw = match self.discount_type {
            DiscountType::Percentage => base_total * self.discount_value / Decimal::from(100),
            DiscountType::Fixed => self.discount_value,
        };

        let capped = match self.maximum_discount {
            Some(maximum) => raw.min(maximum),
            None => raw,
        };

        capped.min(base_total)
    }
}

/// An already-issued coupon attached to a specific booking or quotation.
/// Structurally a promotion, but resolved to an absolute amount before the
/// request is priced, and tracked as its own breakdown channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub minimum_amount: Option<Decimal>,
    #[serde(default)]
    pub maximum_discount: Option<Decimal>,
}

impl Coupon {
    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(start) = self.start_date {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if now > end {
                return false;
            }
        }
        true
    }

    /// Resolves the coupon into the absolute amount carried on the request.
    pub fn resolve_discount(&self, base_total: Decimal) -> Decimal {
        if let Some(minimum) = self.minimum_amount {
            if base_total < minimum {
                return Decimal::ZERO;
            }
        }

        match self.discount_type {
            DiscountType::Percentage => {
                let raw = base_total * self.discount_value / Decimal::from(100);
                match self.maximum_discount {
                    Some(maximum) => raw.min(maximum),
                    None => raw,
                }
            }
            DiscountType::Fixed => self.discount_value.min(base_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{Coupon, DiscountType, Promotion};

    fn promotion(discount_type: DiscountType, value: i64) -> Promotion {
        Promotion {
            code: "SUMMER25".to_string(),
            name: "Summer campaign".to_string(),
            discount_type,
            discount_value: Decimal::from(value),
            is_active: true,
            start_date: None,
            end_date: None,
            minimum_amount: None,
            maximum_discount: None,
        }
    }

    #[test]
    fn percentage_promotion_scales_with_base() {
        let promo = promotion(DiscountType::Percentage, 15);
        assert_eq!(promo.discount_for(Decimal::from(10_000)), Decimal::from(1_500));
    }

    #[test]
    fn fixed_promotion_clamps_to_base() {
        let promo = promotion(DiscountType::Fixed, 8_000);
        assert_eq!(promo.discount_for(Decimal::from(5_000)), Decimal::from(5_000));
    }

    #[test]
    fn maximum_discount_caps_percentage_result() {
        let promo = Promotion {
            maximum_discount: Some(Decimal::from(1_000)),
            ..promotion(DiscountType::Percentage, 50)
        };
        assert_eq!(promo.discount_for(Decimal::from(10_000)), Decimal::from(1_000));
    }

    #[test]
    fn below_minimum_amount_contributes_zero() {
        let promo = Promotion {
            minimum_amount: Some(Decimal::from(20_000)),
            ..promotion(DiscountType::Percentage, 15)
        };
        assert_eq!(promo.discount_for(Decimal::from(10_000)), Decimal::ZERO);
    }

    #[test]
    fn eligibility_respects_active_flag_and_window() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();

        let inactive = Promotion { is_active: false, ..promotion(DiscountType::Fixed, 500) };
        assert!(!inactive.is_eligible_at(now));

        let expired = Promotion {
            end_date: Some(Utc.with_ymd_and_hms(2026, 7, 31, 23, 59, 59).unwrap()),
            ..promotion(DiscountType::Fixed, 500)
        };
        assert!(!expired.is_eligible_at(now));

        let open = Promotion {
            start_date: Some(Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap()),
            end_date: Some(Utc.with_ymd_and_hms(2026, 8, 31, 23, 59, 59).unwrap()),
            ..promotion(DiscountType::Fixed, 500)
        };
        assert!(open.is_eligible_at(now));
    }

    #[test]
    fn coupon_resolution_matches_promotion_rules() {
        let coupon = Coupon {
            code: "WELCOME10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(10),
            is_active: true,
            start_date: None,
            end_date: None,
            minimum_amount: Some(Decimal::from(5_000)),
            maximum_discount: Some(Decimal::from(2_000)),
        };

        assert_eq!(coupon.resolve_discount(Decimal::from(4_000)), Decimal::ZERO);
        assert_eq!(coupon.resolve_discount(Decimal::from(10_000)), Decimal::from(1_000));
        assert_eq!(coupon.resolve_discount(Decimal::from(50_000)), Decimal::from(2_000));
    }
}
