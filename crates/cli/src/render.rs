use rust_decimal::{Decimal, RoundingStrategy};

use fleetfare_core::{PricingBreakdown, TierChangeBreakdown};

/// Display formatting for engine output. The single rounding policy lives
/// here, at the formatting boundary; the engine emits full-precision figures.
pub fn format_currency(amount: Decimal, currency: &str, scale: u32) -> String {
    let rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let magnitude = rounded.abs().to_string();

    let (integer_part, fraction_part) = match magnitude.split_once('.') {
        Some((integer, fraction)) => (integer.to_string(), Some(fraction.to_string())),
        None => (magnitude, None),
    };

    let mut grouped = String::new();
    for (offset, digit) in integer_part.chars().rev().enumerate() {
        if offset > 0 && offset % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let grouped: String = grouped.chars().rev().collect();

    let symbol = currency_symbol(currency);
    let sign = if negative { "-" } else { "" };
    match fraction_part {
        Some(fraction) => format!("{sign}{symbol}{grouped}.{fraction}"),
        None => format!("{sign}{symbol}{grouped}"),
    }
}

fn currency_symbol(currency: &str) -> String {
    match currency {
        "JPY" => "¥".to_string(),
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "THB" => "฿".to_string(),
        other => format!("{other} "),
    }
}

/// Renders the breakdown the way every consumer surface does: only non-zero
/// discount and adjustment rows appear, and nothing is recomputed.
pub fn render_breakdown(breakdown: &PricingBreakdown, scale: u32) -> String {
    let currency = breakdown.currency.as_str();
    let money = |amount: Decimal| format_currency(amount, currency, scale);
    let mut lines = Vec::new();

    if breakdown.service_base_total != Decimal::ZERO || !breakdown.time_adjustments.is_empty() {
        lines.push(row("Services", &money(breakdown.service_base_total)));
    }
    for adjustment in &breakdown.time_adjustments {
        let label = match &adjustment.rule_name {
            Some(rule_name) => format!("  {} ({}%)", rule_name, adjustment.percentage),
            None => format!("  Time adjustment ({}%)", adjustment.percentage),
        };
        lines.push(row(&label, &money(adjustment.amount)));
    }
    if breakdown.package_total != Decimal::ZERO {
        lines.push(row("Package", &money(breakdown.package_total)));
    }
    lines.push(row("Base total", &money(breakdown.base_total)));

    if breakdown.promotion_discount != Decimal::ZERO {
        lines.push(row("Promotion discount", &format!("-{}", money(breakdown.promotion_discount))));
    }
    if breakdown.regular_discount != Decimal::ZERO {
        lines.push(row("Discount", &format!("-{}", money(breakdown.regular_discount))));
    }
    if breakdown.coupon_discount != Decimal::ZERO {
        lines.push(row("Coupon", &format!("-{}", money(breakdown.coupon_discount))));
    }
    if breakdown.total_discount != Decimal::ZERO {
        lines.push(row("Subtotal", &money(breakdown.subtotal)));
    }
    if breakdown.tax_amount != Decimal::ZERO {
        lines.push(row("Tax", &money(breakdown.tax_amount)));
    }
    lines.push(row("Total", &money(breakdown.final_total)));

    lines.join("\n")
}

pub fn render_tier_change(breakdown: &TierChangeBreakdown, scale: u32) -> String {
    let currency = breakdown.pricing.currency.as_str();
    let money = |amount: Decimal| format_currency(amount, currency, scale);
    let mut lines = Vec::new();

    let difference = breakdown.price_difference;
    if difference > Decimal::ZERO {
        lines.push(row("Upgrade amount", &format!("+{}", money(difference))));
    } else if difference < Decimal::ZERO {
        lines.push(row("Downgrade amount", &money(difference)));
    }
    if let Some(refund) = breakdown.refund_amount {
        lines.push(row("Refund due", &money(refund)));
    }
    lines.push(row("Charged service price", &money(breakdown.effective_service_price)));
    lines.push(render_breakdown(&breakdown.pricing, scale));

    lines.join("\n")
}

fn row(label: &str, value: &str) -> String {
    format!("{label:<28}{value:>16}")
}
