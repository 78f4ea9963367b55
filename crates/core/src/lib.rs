pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat, PricingDefaults};
pub use domain::line_item::{LineItem, LineItemKind, TimeAdjustment};
pub use domain::package::{Package, PackageId, PackageItem};
pub use domain::promotion::{Coupon, DiscountType, Promotion};
pub use domain::schedule::{TimeBasedRule, TimeBasedRuleId};
pub use errors::DomainError;
pub use pricing::{
    price_request, price_tier_change, resolve_adjustment, resolve_adjustment_at,
    DeterministicPricingEngine, LineAdjustment, PricingBreakdown, PricingEngine, PricingRequest,
    PricingTrace, PricingTraceStep, ResolvedAdjustment, TierChange, TierChangeBreakdown,
};
