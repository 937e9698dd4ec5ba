//! Caller identity resolution.
//!
//! An API gateway in front of this service forwards the caller's identity
//! in `x-cognito-*` headers. Registered users carry a user-pool subject
//! whose attributes (role, bound shop) live in the pool; visitors carry
//! only an identity-pool id.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use shoporders_core::auth::AppUser;

pub const AUTH_PROVIDER_HEADER: &str = "x-cognito-authentication-provider";
pub const AUTH_TYPE_HEADER: &str = "x-cognito-authentication-type";
pub const IDENTITY_ID_HEADER: &str = "x-cognito-identity-id";

/// The raw identity the gateway forwarded, before any pool lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestIdentity {
    /// Pool-authenticated caller, identified by the subject id.
    Registered { sub: String },
    /// Anonymous caller, identified by the identity-pool id.
    Visitor { id: String },
}

impl RequestIdentity {
    /// Reads the forwarded identity headers. Returns `None` when the
    /// request carries no identity at all.
    ///
    /// The provider header ends in `:<sub>` and the identity id header in
    /// `:<id>`; only the final segment matters.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let auth_type = headers
            .get(AUTH_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())?;

        if auth_type == "authenticated" {
            let provider = headers
                .get(AUTH_PROVIDER_HEADER)
                .and_then(|v| v.to_str().ok())?;
            let sub = provider.rsplit(':').next()?.to_string();
            Some(Self::Registered { sub })
        } else {
            let identity_id = headers
                .get(IDENTITY_ID_HEADER)
                .and_then(|v| v.to_str().ok())?;
            let id = identity_id.rsplit(':').next()?.to_string();
            Some(Self::Visitor { id })
        }
    }

    /// Resolves the identity into a full user, consulting the directory
    /// for registered users' attributes.
    pub async fn resolve(&self, directory: &Arc<dyn UserDirectory>) -> anyhow::Result<AppUser> {
        match self {
            Self::Registered { sub } => {
                let attributes = directory.user_attributes(sub).await?;
                Ok(AppUser::registered(sub.clone(), attributes))
            }
            Self::Visitor { id } => Ok(AppUser::visitor(id.clone())),
        }
    }
}

/// Lookup of registered-user attributes by subject id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_attributes(&self, sub: &str) -> anyhow::Result<HashMap<String, String>>;
}

/// Directory backed by a Cognito user pool.
#[derive(Debug, Clone)]
pub struct CognitoDirectory {
    client: aws_sdk_cognitoidentityprovider::Client,
    user_pool_id: String,
}

impl CognitoDirectory {
    pub fn new(
        client: aws_sdk_cognitoidentityprovider::Client,
        user_pool_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            user_pool_id: user_pool_id.into(),
        }
    }
}

#[async_trait]
impl UserDirectory for CognitoDirectory {
    async fn user_attributes(&self, sub: &str) -> anyhow::Result<HashMap<String, String>> {
        let result = self
            .client
            .list_users()
            .user_pool_id(&self.user_pool_id)
            .filter(format!("sub = \"{sub}\""))
            .limit(1)
            .send()
            .await?;

        let Some(user) = result.users().first() else {
            tracing::warn!(sub, "No user-pool record for subject");
            return Ok(HashMap::new());
        };

        let attributes = user
            .attributes()
            .iter()
            .filter_map(|attr| {
                attr.value()
                    .map(|value| (attr.name().to_string(), value.to_string()))
            })
            .collect();

        Ok(attributes)
    }
}

/// Fixed in-process directory for local development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: HashMap<String, HashMap<String, String>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(
        mut self,
        sub: impl Into<String>,
        attributes: HashMap<String, String>,
    ) -> Self {
        self.users.insert(sub.into(), attributes);
        self
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn user_attributes(&self, sub: &str) -> anyhow::Result<HashMap<String, String>> {
        Ok(self.users.get(sub).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use shoporders_core::auth::{UserKind, ROLE_ATTRIBUTE};

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_registered_identity_takes_sub_from_provider_suffix() {
        let map = headers(&[
            (AUTH_TYPE_HEADER, "authenticated"),
            (
                AUTH_PROVIDER_HEADER,
                "cognito-idp.eu-west-1.amazonaws.com/pool,cognito-idp.eu-west-1.amazonaws.com/pool:CognitoSignIn:sub-1234",
            ),
        ]);

        assert_eq!(
            RequestIdentity::from_headers(&map),
            Some(RequestIdentity::Registered {
                sub: "sub-1234".to_string()
            })
        );
    }

    #[test]
    fn test_visitor_identity_takes_id_from_identity_suffix() {
        let map = headers(&[
            (AUTH_TYPE_HEADER, "unauthenticated"),
            (IDENTITY_ID_HEADER, "eu-west-1:visitor-uuid"),
        ]);

        assert_eq!(
            RequestIdentity::from_headers(&map),
            Some(RequestIdentity::Visitor {
                id: "visitor-uuid".to_string()
            })
        );
    }

    #[test]
    fn test_missing_headers_yield_no_identity() {
        assert_eq!(RequestIdentity::from_headers(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_resolve_registered_consults_directory() {
        let directory: Arc<dyn UserDirectory> = Arc::new(StaticDirectory::new().with_user(
            "sub-1234",
            HashMap::from([(ROLE_ATTRIBUTE.to_string(), "customer".to_string())]),
        ));

        let identity = RequestIdentity::Registered {
            sub: "sub-1234".to_string(),
        };
        let user = identity.resolve(&directory).await.unwrap();

        assert_eq!(user.kind, UserKind::RegisteredUser);
        assert!(user.is_customer());
    }

    #[tokio::test]
    async fn test_resolve_visitor_skips_directory() {
        let directory: Arc<dyn UserDirectory> = Arc::new(StaticDirectory::new());

        let identity = RequestIdentity::Visitor {
            id: "visitor-uuid".to_string(),
        };
        let user = identity.resolve(&directory).await.unwrap();

        assert_eq!(user.kind, UserKind::Visitor);
        assert_eq!(user.id, "visitor-uuid");
    }
}
