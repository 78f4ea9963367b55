use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use fleetfare_core::{price_tier_change, AppConfig, LoadOptions, PricingRequest, TierChange};

use crate::render;

use super::CommandResult;

pub struct TierArgs {
    pub previous_price: Decimal,
    pub new_price: Decimal,
    pub free_upgrade: bool,
    pub tax_percent: Option<Decimal>,
    pub regular_discount_percent: Option<Decimal>,
    pub json: bool,
}

pub fn run(args: TierArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure("tier", "config_validation", error.to_string(), 2),
    };

    if args.previous_price < Decimal::ZERO || args.new_price < Decimal::ZERO {
        return CommandResult::failure(
            "tier",
            "request_validation",
            "tier prices must not be negative",
            2,
        );
    }

    let request = PricingRequest {
        line_items: Vec::new(),
        package: None,
        promotion: None,
        coupon_discount: Decimal::ZERO,
        regular_discount_percent: args
            .regular_discount_percent
            .unwrap_or(config.defaults.regular_discount_percent),
        tax_percent: args.tax_percent.unwrap_or(config.defaults.tax_percent),
    };
    let change = TierChange {
        previous_price: args.previous_price,
        new_price: args.new_price,
        is_free_upgrade: args.free_upgrade,
    };

    let breakdown = price_tier_change(&request, &change, &config.defaults.currency);
    info!(
        event_name = "pricing.tier_change.priced",
        correlation_id = %Uuid::new_v4(),
        free_upgrade = change.is_free_upgrade,
        price_difference = %breakdown.price_difference,
        final_total = %breakdown.pricing.final_total,
        "tier change priced"
    );

    if args.json {
        match serde_json::to_string_pretty(&breakdown) {
            Ok(payload) => CommandResult::success(payload),
            Err(error) => CommandResult::failure("tier", "serialization", error.to_string(), 1),
        }
    } else {
        CommandResult::success(render::render_tier_change(
            &breakdown,
            config.defaults.rounding_scale,
        ))
    }
}
