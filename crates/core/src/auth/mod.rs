//! Resolved identities and authorization policy.

mod policy;
mod types;

pub use policy::{can_view_order, shop_token_matches};
pub use types::{AppUser, UserKind, ROLE_ATTRIBUTE, SHOP_ID_ATTRIBUTE};
