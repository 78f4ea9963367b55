use std::fs;
use std::path::Path;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use fleetfare_core::{
    price_request, AppConfig, LineItem, LoadOptions, Package, PricingRequest, Promotion,
};

use crate::render;

use super::CommandResult;

/// On-disk request shape. Optional figures fall back to the configured
/// pricing defaults rather than hard-coded constants.
#[derive(Debug, Deserialize)]
pub struct RequestFile {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub package: Option<Package>,
    #[serde(default)]
    pub promotion: Option<Promotion>,
    #[serde(default)]
    pub coupon_discount: Option<Decimal>,
    #[serde(default)]
    pub regular_discount_percent: Option<Decimal>,
    #[serde(default)]
    pub tax_percent: Option<Decimal>,
}

pub fn run(path: &Path, json: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure("price", "config_validation", error.to_string(), 2),
    };

    let request_file = match read_request_file(path) {
        Ok(request_file) => request_file,
        Err(error) => return CommandResult::failure("price", "request_file", error, 2),
    };

    let currency =
        request_file.currency.clone().unwrap_or_else(|| config.defaults.currency.clone());
    let request = into_request(request_file, &config);

    if let Err(error) = request.validate() {
        return CommandResult::failure("price", "request_validation", error.to_string(), 2);
    }

    let breakdown = price_request(&request, &currency);
    info!(
        event_name = "pricing.request.priced",
        correlation_id = %Uuid::new_v4(),
        line_items = request.line_items.len(),
        final_total = %breakdown.final_total,
        currency = %breakdown.currency,
        "request priced"
    );

    if json {
        match serde_json::to_string_pretty(&breakdown) {
            Ok(payload) => CommandResult::success(payload),
            Err(error) => CommandResult::failure("price", "serialization", error.to_string(), 1),
        }
    } else {
        CommandResult::success(render::render_breakdown(&breakdown, config.defaults.rounding_scale))
    }
}

fn into_request(request_file: RequestFile, config: &AppConfig) -> PricingRequest {
    // Eligibility is a caller concern: an inactive or out-of-window promotion
    // must reach the engine as absent input, contributing zero.
    let promotion =
        request_file.promotion.filter(|promotion| promotion.is_eligible_at(Utc::now()));

    PricingRequest {
        line_items: request_file.line_items,
        package: request_file.package,
        promotion,
        coupon_discount: request_file.coupon_discount.unwrap_or(Decimal::ZERO),
        regular_discount_percent: request_file
            .regular_discount_percent
            .unwrap_or(config.defaults.regular_discount_percent),
        tax_percent: request_file.tax_percent.unwrap_or(config.defaults.tax_percent),
    }
}

fn read_request_file(path: &Path) -> Result<RequestFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read request file `{}`: {error}", path.display()))?;

    let is_toml = path.extension().and_then(|ext| ext.to_str()) == Some("toml");
    if is_toml {
        toml::from_str(&raw)
            .map_err(|error| format!("could not parse request file `{}`: {error}", path.display()))
    } else {
        serde_json::from_str(&raw)
            .map_err(|error| format!("could not parse request file `{}`: {error}", path.display()))
    }
}
