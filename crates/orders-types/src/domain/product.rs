use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price and stock of a catalog product at the moment it was read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
}

impl ProductSnapshot {
    pub fn covers(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_catalog_payload_with_float_price() {
        let snap: ProductSnapshot = serde_json::from_str(
            r#"{"id":"p1","name":"Headset","description":"Wireless","price":99.9,"stock":15}"#,
        )
        .unwrap();
        assert_eq!(snap.price, Decimal::new(999, 1));
        assert_eq!(snap.stock, 15);
        assert!(snap.covers(15));
        assert!(!snap.covers(16));
    }
}
