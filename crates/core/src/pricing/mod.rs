pub mod breakdown;
pub mod time_rules;
pub mod upgrade;

pub use breakdown::{
    price_request, LineAdjustment, PricingBreakdown, PricingRequest, PricingTrace,
    PricingTraceStep,
};
pub use time_rules::{resolve_adjustment, resolve_adjustment_at, ResolvedAdjustment};
pub use upgrade::{price_tier_change, TierChange, TierChangeBreakdown};

/// Seam for callers that want to inject a pricing double in tests. The
/// shipped implementation is pure and deterministic; engines must stay safe
/// to share across threads because independent quotations are priced
/// concurrently.
pub trait PricingEngine: Send + Sync {
    fn price(&self, request: &PricingRequest, currency: &str) -> PricingBreakdown;

    fn price_tier_change(
        &self,
        request: &PricingRequest,
        change: &TierChange,
        currency: &str,
    ) -> TierChangeBreakdown;
}

#[derive(Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, request: &PricingRequest, currency: &str) -> PricingBreakdown {
        price_request(request, currency)
    }

    fn price_tier_change(
        &self,
        request: &PricingRequest,
        change: &TierChange,
        currency: &str,
    ) -> TierChangeBreakdown {
        upgrade::price_tier_change(request, change, currency)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::line_item::LineItem;

    use super::{DeterministicPricingEngine, PricingBreakdown, PricingEngine, PricingRequest};

    fn request() -> PricingRequest {
        PricingRequest {
            line_items: vec![LineItem::service("Airport transfer", Decimal::from(12_000))],
            package: None,
            promotion: None,
            coupon_discount: Decimal::ZERO,
            regular_discount_percent: Decimal::ZERO,
            tax_percent: Decimal::from(10),
        }
    }

    #[test]
    fn engine_trait_routes_to_the_pure_computation() {
        let engine = DeterministicPricingEngine;
        let breakdown = engine.price(&request(), "JPY");

        assert_eq!(breakdown.final_total, Decimal::from(13_200));
        assert_eq!(breakdown, super::price_request(&request(), "JPY"));
    }

    #[test]
    fn callers_can_substitute_a_test_double() {
        struct FixedPriceEngine;

        impl PricingEngine for FixedPriceEngine {
            fn price(&self, request: &PricingRequest, currency: &str) -> PricingBreakdown {
                let mut breakdown = super::price_request(request, currency);
                breakdown.final_total = Decimal::from(1);
                breakdown
            }

            fn price_tier_change(
                &self,
                request: &PricingRequest,
                change: &super::TierChange,
                currency: &str,
            ) -> super::TierChangeBreakdown {
                super::price_tier_change(request, change, currency)
            }
        }

        let engine: Box<dyn PricingEngine> = Box::new(FixedPriceEngine);
        assert_eq!(engine.price(&request(), "JPY").final_total, Decimal::from(1));
    }
}
