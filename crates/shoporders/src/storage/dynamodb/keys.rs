//! DynamoDB key generation for the single-table design.
//!
//! Pure functions mapping domain identifiers to composite keys. Together
//! with `conversions`, this is the only code aware of the packing scheme.

use shoporders_core::storage::{Result, StoreError};

// ============================================================================
// Attribute names
// ============================================================================

pub const ATTR_PK: &str = "PK";
pub const ATTR_SK: &str = "SK";
pub const ATTR_GSI1_PK: &str = "GSI1-PK";
pub const ATTR_GSI1_SK: &str = "GSI1-SK";
pub const ATTR_GSI2_PK: &str = "GSI2-PK";
pub const ATTR_GSI2_SK: &str = "GSI2-SK";
pub const ATTR_ENTITY_TYPE: &str = "entityType";

pub const GSI1_INDEX: &str = "GSI1";
pub const GSI2_INDEX: &str = "GSI2";

// ============================================================================
// Key prefixes
// ============================================================================

pub const SHOP_PREFIX: &str = "s#";
pub const PRODUCT_PREFIX: &str = "p#";
pub const ORDER_PREFIX: &str = "o#";

/// Rejects empty identifiers before they become malformed keys.
pub fn ensure_id(id: &str, what: &'static str) -> Result<()> {
    if id.is_empty() {
        return Err(StoreError::InvalidData(format!("empty {what} id")));
    }
    Ok(())
}

/// Partition key for a shop and everything stored under it.
///
/// Pattern: `s#<shop_id>`
pub fn shop_pk(shop_id: &str) -> String {
    format!("{SHOP_PREFIX}{shop_id}")
}

/// Sort key for the shop item itself (same as its PK).
pub fn shop_sk(shop_id: &str) -> String {
    format!("{SHOP_PREFIX}{shop_id}")
}

/// Sort key for a product under its shop partition.
///
/// Pattern: `p#<product_id>`
pub fn product_sk(product_id: &str) -> String {
    format!("{PRODUCT_PREFIX}{product_id}")
}

/// Partition key for an order and its line items.
///
/// Pattern: `o#<order_id>`
pub fn order_pk(order_id: &str) -> String {
    format!("{ORDER_PREFIX}{order_id}")
}

/// Sort key for the order header item (same as its PK).
pub fn order_sk(order_id: &str) -> String {
    format!("{ORDER_PREFIX}{order_id}")
}

/// Sort key prefix selecting all products (or line items) in a partition.
pub fn product_sk_prefix() -> &'static str {
    PRODUCT_PREFIX
}

/// Extracts the domain id from a prefixed key: the part after the last `#`.
pub fn id_from_key(key: &str) -> &str {
    key.rsplit('#').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_keys() {
        assert_eq!(shop_pk("0001"), "s#0001");
        assert_eq!(shop_sk("0001"), "s#0001");
    }

    #[test]
    fn test_product_sk() {
        assert_eq!(product_sk("0011"), "p#0011");
    }

    #[test]
    fn test_order_keys() {
        assert_eq!(order_pk("1234"), "o#1234");
        assert_eq!(order_sk("1234"), "o#1234");
    }

    #[test]
    fn test_id_from_key() {
        assert_eq!(id_from_key("s#0001"), "0001");
        assert_eq!(id_from_key("v#11112222"), "11112222");
        assert_eq!(id_from_key("no-prefix"), "no-prefix");
    }

    #[test]
    fn test_ensure_id_rejects_empty() {
        assert!(ensure_id("", "shop").is_err());
        assert!(ensure_id("0001", "shop").is_ok());
    }

    #[test]
    fn test_product_sk_prefix() {
        assert_eq!(product_sk_prefix(), "p#");
    }
}
