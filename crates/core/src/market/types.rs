use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered shop. The token is rotated administratively and may be
/// absent on shops created before token support was introduced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub shop_id: String,
    pub name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_token: Option<String>,
}

impl Shop {
    /// Creates a new shop without a token.
    pub fn new(
        shop_id: impl Into<String>,
        name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            shop_id: shop_id.into(),
            name: name.into(),
            phone_number: phone_number.into(),
            address: None,
            shop_token: None,
        }
    }

    /// Sets the shop address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the shop token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.shop_token = Some(token.into());
        self
    }
}

/// A product offered by a shop. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub shop_id: String,
    pub product_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "crate::serde::decimal_number")]
    pub price: Decimal,
}

impl Product {
    pub fn new(
        shop_id: impl Into<String>,
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            shop_id: shop_id.into(),
            product_id: product_id.into(),
            name: name.into(),
            description: None,
            price,
        }
    }

    /// Sets the product description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Order lifecycle status. Only `Pending` is ever written today; status
/// transitions are not part of this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
}

/// An order header. `amount` is the sum of line totals computed at
/// placement time and is never recomputed from current product prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub shop_id: String,
    pub customer_id: String,
    pub status: OrderStatus,
    #[serde(with = "crate::serde::decimal_number")]
    pub amount: Decimal,
    pub phone_number: String,
    pub name: String,
    pub date: DateTime<Utc>,
}

/// A single line of an order, carrying the product name and price as they
/// were when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: String,
    pub quantity: u32,
    pub name: String,
    #[serde(with = "crate::serde::decimal_number")]
    pub price: Decimal,
}

impl OrderLineItem {
    /// Price times quantity for this line.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let line = OrderLineItem {
            product_id: "0011".to_string(),
            quantity: 3,
            name: "Bread".to_string(),
            price: Decimal::from(110),
        };
        assert_eq!(line.line_total(), Decimal::from(330));
    }

    #[test]
    fn test_order_status_serializes_screaming() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }

    #[test]
    fn test_shop_serialization_skips_missing_optionals() {
        let shop = Shop::new("0001", "Shop 0001", "0770001111");
        let value = serde_json::to_value(&shop).unwrap();
        assert_eq!(value["shopId"], "0001");
        assert!(value.get("address").is_none());
        assert!(value.get("shopToken").is_none());
    }

    #[test]
    fn test_shop_builder() {
        let shop = Shop::new("0001", "Shop 0001", "0770001111")
            .with_address("Dammweg 3, Bern")
            .with_token("ABC123");
        assert_eq!(shop.address.as_deref(), Some("Dammweg 3, Bern"));
        assert_eq!(shop.shop_token.as_deref(), Some("ABC123"));
    }
}
