use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Resolved once when the request is assembled; the computation never
/// re-inspects names or type strings to decide how a line is priced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Service,
    Package,
}

impl Default for LineItemKind {
    fn default() -> Self {
        Self::Service
    }
}

/// Signed percentage applied to a line's base amount. Positive is a
/// surcharge, negative an off-peak reduction. `rule_name` is display only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAdjustment {
    pub percentage: Decimal,
    #[serde(default)]
    pub rule_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub kind: LineItemKind,
    pub description: String,
    pub unit_price: Decimal,
    #[serde(default = "default_count")]
    pub quantity: u32,
    #[serde(default = "default_count")]
    pub service_days: u32,
    #[serde(default)]
    pub time_adjustment: Option<TimeAdjustment>,
}

fn default_count() -> u32 {
    1
}

impl LineItem {
    pub fn service(description: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            kind: LineItemKind::Service,
            description: description.into(),
            unit_price,
            quantity: 1,
            service_days: 1,
            time_adjustment: None,
        }
    }

    /// Package-kind lines are flat: the unit price is charged once,
    /// never multiplied by quantity or day counts.
    pub fn base_price(&self) -> Decimal {
        match self.kind {
            LineItemKind::Service => {
                self.unit_price * Decimal::from(self.quantity) * Decimal::from(self.service_days)
            }
            LineItemKind::Package => self.unit_price,
        }
    }

    pub fn adjustment_amount(&self) -> Decimal {
        match &self.time_adjustment {
            Some(adjustment) => {
                self.base_price() * adjustment.percentage / Decimal::from(100)
            }
            None => Decimal::ZERO,
        }
    }

    pub fn adjusted_price(&self) -> Decimal {
        self.base_price() + self.adjustment_amount()
    }
}
