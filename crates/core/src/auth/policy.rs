//! Pure authorization predicates over a resolved identity and a resource.

use crate::market::{Order, Shop};

use super::AppUser;

/// An order is visible to its own customer, and to a shop owner whose
/// bound shop matches the order's shop.
pub fn can_view_order(user: &AppUser, order: &Order) -> bool {
    if user.id == order.customer_id {
        return true;
    }
    user.is_shop_owner() && user.shop_id() == Some(order.shop_id.as_str())
}

/// Token-gated shop access: plain equality against the stored token.
/// A shop without a token admits nobody.
pub fn shop_token_matches(shop: &Shop, presented: &str) -> bool {
    shop.shop_token.as_deref() == Some(presented)
}
