use serde::Deserialize;
use thiserror::Error;

/// Validation failures for incoming order requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("shopId must not be empty")]
    EmptyShopId,
    #[error("phoneNumber must not be empty")]
    EmptyPhoneNumber,
    #[error("name must not be empty")]
    EmptyName,
    #[error("items must not be empty")]
    NoItems,
    #[error("item quantity must be at least 1")]
    ZeroQuantity,
}

/// One requested product line in a new order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// Payload for placing a new order. Field presence is enforced by
/// deserialization; `validate` rejects empty values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub shop_id: String,
    pub phone_number: String,
    pub name: String,
    pub items: Vec<OrderItemRequest>,
}

impl PlaceOrder {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.shop_id.trim().is_empty() {
            return Err(ValidationError::EmptyShopId);
        }
        if self.phone_number.trim().is_empty() {
            return Err(ValidationError::EmptyPhoneNumber);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.items.is_empty() {
            return Err(ValidationError::NoItems);
        }
        if self.items.iter().any(|item| item.quantity == 0) {
            return Err(ValidationError::ZeroQuantity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> PlaceOrder {
        PlaceOrder {
            shop_id: "0001".to_string(),
            phone_number: "0770001111".to_string(),
            name: "Visitor Customer #1".to_string(),
            items: vec![OrderItemRequest {
                product_id: "0011".to_string(),
                quantity: 1,
            }],
        }
    }

    #[test]
    fn test_valid_order_passes() {
        assert!(sample_order().validate().is_ok());
    }

    #[test]
    fn test_missing_field_is_a_deserialization_error() {
        let json = r#"{"shopId": "0001", "phoneNumber": "0770001111", "name": "X"}"#;
        let result: Result<PlaceOrder, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_shop_id_rejected() {
        let mut order = sample_order();
        order.shop_id = "  ".to_string();
        assert_eq!(order.validate(), Err(ValidationError::EmptyShopId));
    }

    #[test]
    fn test_no_items_rejected() {
        let mut order = sample_order();
        order.items.clear();
        assert_eq!(order.validate(), Err(ValidationError::NoItems));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut order = sample_order();
        order.items[0].quantity = 0;
        assert_eq!(order.validate(), Err(ValidationError::ZeroQuantity));
    }
}
