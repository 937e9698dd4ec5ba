use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identity-provider attribute carrying the user's role.
pub const ROLE_ATTRIBUTE: &str = "custom:role";

/// Identity-provider attribute binding a shop owner to their shop.
pub const SHOP_ID_ATTRIBUTE: &str = "custom:shopId";

/// How the caller authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserKind {
    /// Authenticated against the identity provider's user pool.
    RegisteredUser,
    /// Anonymous caller known only by an identity-pool id.
    Visitor,
}

/// A resolved caller identity. For registered users `attributes` holds the
/// identity-provider user record; visitors carry no attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUser {
    pub kind: UserKind,
    pub id: String,
    pub attributes: HashMap<String, String>,
}

impl AppUser {
    /// Creates a registered user with the given stable subject id.
    pub fn registered(id: impl Into<String>, attributes: HashMap<String, String>) -> Self {
        Self {
            kind: UserKind::RegisteredUser,
            id: id.into(),
            attributes,
        }
    }

    /// Creates an anonymous visitor.
    pub fn visitor(id: impl Into<String>) -> Self {
        Self {
            kind: UserKind::Visitor,
            id: id.into(),
            attributes: HashMap::new(),
        }
    }

    fn has_role(&self, role: &str) -> bool {
        self.kind == UserKind::RegisteredUser
            && self.attributes.get(ROLE_ATTRIBUTE).map(String::as_str) == Some(role)
    }

    /// Visitors and registered users with the customer role may order.
    pub fn is_customer(&self) -> bool {
        self.kind == UserKind::Visitor || self.has_role("customer")
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }

    pub fn is_shop_owner(&self) -> bool {
        self.has_role("shop_owner")
    }

    /// The shop this owner is bound to, if any.
    pub fn shop_id(&self) -> Option<&str> {
        self.attributes.get(SHOP_ID_ATTRIBUTE).map(String::as_str)
    }

    /// The customer partition discriminator: `v#<id>` for visitors,
    /// `c#<id>` for registered customers, `None` for everyone else.
    pub fn customer_key(&self) -> Option<String> {
        match self.kind {
            UserKind::Visitor => Some(format!("v#{}", self.id)),
            UserKind::RegisteredUser if self.has_role("customer") => {
                Some(format!("c#{}", self.id))
            }
            UserKind::RegisteredUser => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered_with_role(role: &str) -> AppUser {
        AppUser::registered(
            "sub-1234",
            HashMap::from([(ROLE_ATTRIBUTE.to_string(), role.to_string())]),
        )
    }

    #[test]
    fn test_visitor_is_customer() {
        let user = AppUser::visitor("11111111-2222-3333-4444-555555555555");
        assert!(user.is_customer());
        assert!(!user.is_admin());
        assert!(!user.is_shop_owner());
    }

    #[test]
    fn test_registered_roles() {
        assert!(registered_with_role("customer").is_customer());
        assert!(registered_with_role("admin").is_admin());
        assert!(registered_with_role("shop_owner").is_shop_owner());
        assert!(!registered_with_role("shop_owner").is_customer());
    }

    #[test]
    fn test_customer_key_visitor() {
        let user = AppUser::visitor("abcd");
        assert_eq!(user.customer_key().as_deref(), Some("v#abcd"));
    }

    #[test]
    fn test_customer_key_registered_customer() {
        let user = registered_with_role("customer");
        assert_eq!(user.customer_key().as_deref(), Some("c#sub-1234"));
    }

    #[test]
    fn test_customer_key_none_for_shop_owner() {
        assert_eq!(registered_with_role("shop_owner").customer_key(), None);
    }

    #[test]
    fn test_shop_id_attribute() {
        let user = AppUser::registered(
            "sub-9",
            HashMap::from([
                (ROLE_ATTRIBUTE.to_string(), "shop_owner".to_string()),
                (SHOP_ID_ATTRIBUTE.to_string(), "0001".to_string()),
            ]),
        );
        assert_eq!(user.shop_id(), Some("0001"));
    }
}
