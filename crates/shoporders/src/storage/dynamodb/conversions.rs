//! Schema abstraction between stored items and domain types.
//!
//! Stored items carry `PK`/`SK`/`GSI*`/`entityType`; domain types never
//! do. Ids are derived from key suffixes on the way out and packed back
//! into keys on the way in. Pure functions, testable without DynamoDB.

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use shoporders_core::market::{Order, OrderLineItem, OrderStatus, Product, Shop};
use shoporders_core::storage::StoreError;

use super::client::Item;
use super::keys;

// ============================================================================
// Entity type tags
// ============================================================================

pub const ENTITY_TYPE_SHOP: &str = "shop";
pub const ENTITY_TYPE_PRODUCT: &str = "product";
pub const ENTITY_TYPE_ORDER: &str = "order";
pub const ENTITY_TYPE_ORDER_ITEM: &str = "orderItem";

// ============================================================================
// Shop conversions
// ============================================================================

/// Convert a Shop to a stored item.
pub fn shop_to_item(shop: &Shop) -> Item {
    let mut item = Item::new();

    item.insert(
        keys::ATTR_PK.to_string(),
        AttributeValue::S(keys::shop_pk(&shop.shop_id)),
    );
    item.insert(
        keys::ATTR_SK.to_string(),
        AttributeValue::S(keys::shop_sk(&shop.shop_id)),
    );
    item.insert(
        keys::ATTR_ENTITY_TYPE.to_string(),
        AttributeValue::S(ENTITY_TYPE_SHOP.to_string()),
    );

    item.insert("name".to_string(), AttributeValue::S(shop.name.clone()));
    item.insert(
        "phoneNumber".to_string(),
        AttributeValue::S(shop.phone_number.clone()),
    );
    if let Some(address) = &shop.address {
        item.insert("address".to_string(), AttributeValue::S(address.clone()));
    }
    if let Some(token) = &shop.shop_token {
        item.insert("shopToken".to_string(), AttributeValue::S(token.clone()));
    }

    item
}

/// Convert a stored item to a Shop, deriving the id from the PK suffix.
pub fn item_to_shop(item: &Item) -> Result<Shop, StoreError> {
    Ok(Shop {
        shop_id: keys::id_from_key(&get_string(item, keys::ATTR_PK)?).to_string(),
        name: get_string(item, "name")?,
        phone_number: get_string(item, "phoneNumber")?,
        address: get_optional_string(item, "address"),
        shop_token: get_optional_string(item, "shopToken"),
    })
}

// ============================================================================
// Product conversions
// ============================================================================

/// Convert a Product to a stored item under its shop partition.
pub fn product_to_item(product: &Product) -> Item {
    let mut item = Item::new();

    item.insert(
        keys::ATTR_PK.to_string(),
        AttributeValue::S(keys::shop_pk(&product.shop_id)),
    );
    item.insert(
        keys::ATTR_SK.to_string(),
        AttributeValue::S(keys::product_sk(&product.product_id)),
    );
    item.insert(
        keys::ATTR_ENTITY_TYPE.to_string(),
        AttributeValue::S(ENTITY_TYPE_PRODUCT.to_string()),
    );

    item.insert("name".to_string(), AttributeValue::S(product.name.clone()));
    if let Some(description) = &product.description {
        item.insert(
            "description".to_string(),
            AttributeValue::S(description.clone()),
        );
    }
    item.insert(
        "price".to_string(),
        AttributeValue::N(product.price.to_string()),
    );

    item
}

/// Convert a stored item to a Product.
pub fn item_to_product(item: &Item) -> Result<Product, StoreError> {
    Ok(Product {
        shop_id: keys::id_from_key(&get_string(item, keys::ATTR_PK)?).to_string(),
        product_id: keys::id_from_key(&get_string(item, keys::ATTR_SK)?).to_string(),
        name: get_string(item, "name")?,
        description: get_optional_string(item, "description"),
        price: get_decimal(item, "price")?,
    })
}

// ============================================================================
// Order conversions
// ============================================================================

/// Convert an order header to a stored item. `customer_key` is the full
/// prefixed customer discriminator (`c#..`/`v#..`); the bare
/// `order.customer_id` cannot reconstruct it.
pub fn order_to_item(order: &Order, customer_key: &str) -> Item {
    let date = order.date.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut item = Item::new();

    item.insert(
        keys::ATTR_PK.to_string(),
        AttributeValue::S(keys::order_pk(&order.order_id)),
    );
    item.insert(
        keys::ATTR_SK.to_string(),
        AttributeValue::S(keys::order_sk(&order.order_id)),
    );
    item.insert(
        keys::ATTR_GSI1_PK.to_string(),
        AttributeValue::S(keys::shop_pk(&order.shop_id)),
    );
    item.insert(
        keys::ATTR_GSI1_SK.to_string(),
        AttributeValue::S(date.clone()),
    );
    item.insert(
        keys::ATTR_GSI2_PK.to_string(),
        AttributeValue::S(customer_key.to_string()),
    );
    item.insert(
        keys::ATTR_GSI2_SK.to_string(),
        AttributeValue::S(date.clone()),
    );
    item.insert(
        keys::ATTR_ENTITY_TYPE.to_string(),
        AttributeValue::S(ENTITY_TYPE_ORDER.to_string()),
    );

    item.insert(
        "status".to_string(),
        AttributeValue::S(status_to_string(order.status).to_string()),
    );
    item.insert(
        "amount".to_string(),
        AttributeValue::N(order.amount.to_string()),
    );
    item.insert(
        "phoneNumber".to_string(),
        AttributeValue::S(order.phone_number.clone()),
    );
    item.insert("name".to_string(), AttributeValue::S(order.name.clone()));
    item.insert("date".to_string(), AttributeValue::S(date));

    item
}

/// Convert a stored item to an order header. Ids are derived from the
/// `PK`, `GSI1-PK` and `GSI2-PK` suffixes.
pub fn item_to_order(item: &Item) -> Result<Order, StoreError> {
    Ok(Order {
        order_id: keys::id_from_key(&get_string(item, keys::ATTR_PK)?).to_string(),
        shop_id: keys::id_from_key(&get_string(item, keys::ATTR_GSI1_PK)?).to_string(),
        customer_id: keys::id_from_key(&get_string(item, keys::ATTR_GSI2_PK)?).to_string(),
        status: parse_status(&get_string(item, "status")?)?,
        amount: get_decimal(item, "amount")?,
        phone_number: get_string(item, "phoneNumber")?,
        name: get_string(item, "name")?,
        date: get_datetime(item, "date")?,
    })
}

/// Convert an order line to a stored item under its order partition.
pub fn line_item_to_item(order_id: &str, line: &OrderLineItem) -> Item {
    let mut item = Item::new();

    item.insert(
        keys::ATTR_PK.to_string(),
        AttributeValue::S(keys::order_pk(order_id)),
    );
    item.insert(
        keys::ATTR_SK.to_string(),
        AttributeValue::S(keys::product_sk(&line.product_id)),
    );
    item.insert(
        keys::ATTR_ENTITY_TYPE.to_string(),
        AttributeValue::S(ENTITY_TYPE_ORDER_ITEM.to_string()),
    );

    item.insert(
        "quantity".to_string(),
        AttributeValue::N(line.quantity.to_string()),
    );
    item.insert("name".to_string(), AttributeValue::S(line.name.clone()));
    item.insert(
        "price".to_string(),
        AttributeValue::N(line.price.to_string()),
    );

    item
}

/// Convert a stored item to an order line.
pub fn item_to_line_item(item: &Item) -> Result<OrderLineItem, StoreError> {
    Ok(OrderLineItem {
        product_id: keys::id_from_key(&get_string(item, keys::ATTR_SK)?).to_string(),
        quantity: get_u32(item, "quantity")?,
        name: get_string(item, "name")?,
        price: get_decimal(item, "price")?,
    })
}

// ============================================================================
// Status conversions
// ============================================================================

pub fn status_to_string(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "PENDING",
    }
}

pub fn parse_status(s: &str) -> Result<OrderStatus, StoreError> {
    match s {
        "PENDING" => Ok(OrderStatus::Pending),
        _ => Err(StoreError::InvalidData(format!("Unknown status: {}", s))),
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, StoreError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute.
fn get_optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Get a required numeric attribute as a Decimal.
fn get_decimal(item: &Item, key: &str) -> Result<Decimal, StoreError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))?
        .parse()
        .map_err(|e| StoreError::InvalidData(format!("Invalid number {}: {}", key, e)))
}

/// Get a required numeric attribute as a u32.
fn get_u32(item: &Item, key: &str) -> Result<u32, StoreError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))?
        .parse()
        .map_err(|e| StoreError::InvalidData(format!("Invalid number {}: {}", key, e)))
}

/// Get a required RFC 3339 datetime attribute.
fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, StoreError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}
