use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(pub String);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageItem {
    pub name: String,
    pub price: Decimal,
}

/// A bundled flat-price offering. `base_price` is added once to the
/// breakdown; the included items only feed the displayed savings figure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    pub base_price: Decimal,
    #[serde(default)]
    pub items: Vec<PackageItem>,
}

impl Package {
    /// Sum of included item prices minus the bundle price. Display only.
    pub fn savings(&self) -> Decimal {
        let itemized: Decimal = self.items.iter().map(|item| item.price).sum();
        itemized - self.base_price
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Package, PackageId, PackageItem};

    #[test]
    fn savings_is_itemized_total_minus_bundle_price() {
        let package = Package {
            id: PackageId("pkg-tokyo-day".to_string()),
            name: "Tokyo full-day package".to_string(),
            base_price: Decimal::from(42_000),
            items: vec![
                PackageItem { name: "Airport transfer".to_string(), price: Decimal::from(18_000) },
                PackageItem { name: "City charter".to_string(), price: Decimal::from(30_000) },
            ],
        };

        assert_eq!(package.savings(), Decimal::from(6_000));
    }

    #[test]
    fn savings_of_empty_bundle_is_negative_base_price() {
        let package = Package {
            id: PackageId("pkg-min".to_string()),
            name: "Flat bundle".to_string(),
            base_price: Decimal::from(5_000),
            items: Vec::new(),
        };

        assert_eq!(package.savings(), Decimal::from(-5_000));
    }
}
