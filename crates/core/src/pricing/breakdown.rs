use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::line_item::LineItem;
use crate::domain::package::Package;
use crate::domain::promotion::Promotion;
use crate::errors::DomainError;

/// Everything the computation needs, assembled fresh by the caller from form
/// state or persisted rows. The coupon channel arrives pre-resolved to an
/// absolute amount; eligibility of the promotion has already been checked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub package: Option<Package>,
    #[serde(default)]
    pub promotion: Option<Promotion>,
    #[serde(default)]
    pub coupon_discount: Decimal,
    #[serde(default)]
    pub regular_discount_percent: Decimal,
    #[serde(default)]
    pub tax_percent: Decimal,
}

impl PricingRequest {
    /// Advisory business validation for callers that want to reject nonsense
    /// before display. The computation itself never runs this: it prices
    /// whatever arithmetic it is given and only clamps at the subtotal.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (index, item) in self.line_items.iter().enumerate() {
            if item.unit_price < Decimal::ZERO {
                return Err(DomainError::InvariantViolation(format!(
                    "line item {index} has a negative unit price"
                )));
            }
            if item.quantity == 0 || item.service_days == 0 {
                return Err(DomainError::InvariantViolation(format!(
                    "line item {index} has a zero quantity or day count"
                )));
            }
        }
        if self.coupon_discount < Decimal::ZERO {
            return Err(DomainError::InvariantViolation(
                "coupon discount must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// One per-line time-based adjustment, retained so display layers can render
/// surcharge/reduction rows without recomputing anything.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineAdjustment {
    pub item_index: usize,
    pub description: String,
    pub base_price: Decimal,
    pub percentage: Decimal,
    pub amount: Decimal,
    pub rule_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingTrace {
    pub currency: String,
    pub steps: Vec<PricingTraceStep>,
}

/// The full ordered breakdown. Every consumer (dashboard preview, PDF,
/// payment email) formats these figures and nothing else, so all three
/// surfaces agree line for line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub currency: String,
    pub service_base_total: Decimal,
    pub time_adjustments: Vec<LineAdjustment>,
    pub service_time_adjustment_total: Decimal,
    pub service_total: Decimal,
    pub package_total: Decimal,
    pub base_total: Decimal,
    pub promotion_discount: Decimal,
    pub regular_discount: Decimal,
    pub coupon_discount: Decimal,
    pub total_discount: Decimal,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub final_total: Decimal,
    pub trace: PricingTrace,
}

pub fn price_request(request: &PricingRequest, currency: &str) -> PricingBreakdown {
    compute(request, currency, None)
}

/// The ten-step pipeline. The order is load-bearing: discounts are all taken
/// against the same base total and summed, the subtotal clamps at zero, and
/// tax applies to the discounted subtotal only.
pub(crate) fn compute(
    request: &PricingRequest,
    currency: &str,
    service_total_override: Option<Decimal>,
) -> PricingBreakdown {
    let mut steps = Vec::new();

    // Step 1: per-item base and adjusted prices.
    let mut service_base_total = Decimal::ZERO;
    let mut service_time_adjustment_total = Decimal::ZERO;
    let mut time_adjustments = Vec::new();

    match service_total_override {
        Some(effective) => {
            service_base_total = effective;
        }
        None => {
            for (item_index, item) in request.line_items.iter().enumerate() {
                let base_price = item.base_price();
                service_base_total += base_price;

                if let Some(adjustment) = &item.time_adjustment {
                    let amount = item.adjustment_amount();
                    service_time_adjustment_total += amount;
                    time_adjustments.push(LineAdjustment {
                        item_index,
                        description: item.description.clone(),
                        base_price,
                        percentage: adjustment.percentage,
                        amount,
                        rule_name: adjustment.rule_name.clone(),
                    });
                }
            }
        }
    }

    let service_total = service_base_total + service_time_adjustment_total;
    steps.push(PricingTraceStep {
        stage: "service_total".to_string(),
        detail: "sum(base_price) + sum(time adjustments)".to_string(),
        amount: service_total,
    });

    // Step 2: package flat price, added once.
    let package_total =
        request.package.as_ref().map(|package| package.base_price).unwrap_or(Decimal::ZERO);
    steps.push(PricingTraceStep {
        stage: "package_total".to_string(),
        detail: "package base price".to_string(),
        amount: package_total,
    });

    // Step 3: pre-discount base.
    let base_total = service_total + package_total;
    steps.push(PricingTraceStep {
        stage: "base_total".to_string(),
        detail: "service_total + package_total".to_string(),
        amount: base_total,
    });

    // Steps 4-6: three independent discount channels, each against base_total.
    let promotion_discount = request
        .promotion
        .as_ref()
        .map(|promotion| promotion.discount_for(base_total))
        .unwrap_or(Decimal::ZERO);
    steps.push(PricingTraceStep {
        stage: "promotion_discount".to_string(),
        detail: "promotion applied to base_total".to_string(),
        amount: promotion_discount,
    });

    let regular_discount = base_total * request.regular_discount_percent / Decimal::from(100);
    steps.push(PricingTraceStep {
        stage: "regular_discount".to_string(),
        detail: "base_total * regular_discount_percent / 100".to_string(),
        amount: regular_discount,
    });

    let coupon_discount = request.coupon_discount;
    steps.push(PricingTraceStep {
        stage: "coupon_discount".to_string(),
        detail: "pre-resolved coupon amount".to_string(),
        amount: coupon_discount,
    });

    // Step 7: additive, never compounding.
    let total_discount = promotion_discount + regular_discount + coupon_discount;
    steps.push(PricingTraceStep {
        stage: "total_discount".to_string(),
        detail: "promotion + regular + coupon".to_string(),
        amount: total_discount,
    });

    // Step 8: the only clamp in the pipeline.
    let subtotal = (base_total - total_discount).max(Decimal::ZERO);
    steps.push(PricingTraceStep {
        stage: "subtotal".to_string(),
        detail: "max(0, base_total - total_discount)".to_string(),
        amount: subtotal,
    });

    // Steps 9-10: tax on the discounted subtotal, never on the base.
    let tax_amount = subtotal * request.tax_percent / Decimal::from(100);
    steps.push(PricingTraceStep {
        stage: "tax_amount".to_string(),
        detail: "subtotal * tax_percent / 100".to_string(),
        amount: tax_amount,
    });

    let final_total = subtotal + tax_amount;
    steps.push(PricingTraceStep {
        stage: "final_total".to_string(),
        detail: "subtotal + tax_amount".to_string(),
        amount: final_total,
    });

    PricingBreakdown {
        currency: currency.to_string(),
        service_base_total,
        time_adjustments,
        service_time_adjustment_total,
        service_total,
        package_total,
        base_total,
        promotion_discount,
        regular_discount,
        coupon_discount,
        total_discount,
        subtotal,
        tax_amount,
        final_total,
        trace: PricingTrace { currency: currency.to_string(), steps },
    }
}
