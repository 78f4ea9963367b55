use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::breakdown::{compute, PricingBreakdown, PricingRequest};

/// A booking moving to a different service tier. Both prices are pre-tax,
/// pre-discount service-only figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierChange {
    pub previous_price: Decimal,
    pub new_price: Decimal,
    #[serde(default)]
    pub is_free_upgrade: bool,
}

impl TierChange {
    /// The amount charged as the service total: a free upgrade keeps the
    /// previous tier's price, otherwise the new tier's price applies.
    pub fn effective_service_price(&self) -> Decimal {
        if self.is_free_upgrade {
            self.previous_price
        } else {
            self.new_price
        }
    }

    /// Signed delta for display ("Upgrade Amount +X" / "Downgrade Amount -X").
    /// Informational only; the effective price already reflects the new tier.
    pub fn price_difference(&self) -> Decimal {
        self.new_price - self.previous_price
    }

    /// Refund owed on a pure downgrade. Stays outside the breakdown total;
    /// callers turn it into a refund coupon or a separate payout.
    pub fn refund_amount(&self) -> Option<Decimal> {
        let difference = self.previous_price - self.new_price;
        (difference > Decimal::ZERO).then_some(difference)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierChangeBreakdown {
    pub effective_service_price: Decimal,
    pub price_difference: Decimal,
    pub refund_amount: Option<Decimal>,
    pub pricing: PricingBreakdown,
}

/// Prices a tier change by substituting the effective service price for the
/// request's service total; the rest of the pipeline runs unchanged, so
/// discounts and tax behave exactly as in a fresh quotation.
pub fn price_tier_change(
    request: &PricingRequest,
    change: &TierChange,
    currency: &str,
) -> TierChangeBreakdown {
    let pricing = compute(request, currency, Some(change.effective_service_price()));

    TierChangeBreakdown {
        effective_service_price: change.effective_service_price(),
        price_difference: change.price_difference(),
        refund_amount: change.refund_amount(),
        pricing,
    }
}
