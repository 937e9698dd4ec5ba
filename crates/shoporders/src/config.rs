use std::env;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    DynamoDb,
    InMemory,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the wide-column table (default: "shop-orders")
    pub table_name: String,
    /// Allowed CORS origin; `None` allows any origin
    pub cors_origin: Option<String>,
    /// Cognito user pool holding registered-user attributes; `None`
    /// disables pool lookups and treats every identity as a visitor
    pub user_pool_id: Option<String>,
    /// Storage backend (default: DynamoDB)
    pub storage_backend: StorageBackend,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TABLE_NAME` - Table name (default: "shop-orders")
    /// - `CORS_ORIGIN` - Allowed CORS origin (default: any)
    /// - `USER_POOL_ID` - Cognito user pool id (default: none)
    /// - `STORAGE_BACKEND` - "dynamodb" or "inmemory" (default: "dynamodb")
    pub fn from_env() -> Self {
        let storage_backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("inmemory") => StorageBackend::InMemory,
            _ => StorageBackend::DynamoDb,
        };

        Self {
            table_name: env::var("TABLE_NAME").unwrap_or_else(|_| "shop-orders".to_string()),
            cors_origin: env::var("CORS_ORIGIN").ok(),
            user_pool_id: env::var("USER_POOL_ID").ok(),
            storage_backend,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: "shop-orders".to_string(),
            cors_origin: None,
            user_pool_id: None,
            storage_backend: StorageBackend::InMemory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.table_name, "shop-orders");
        assert_eq!(config.cors_origin, None);
        assert_eq!(config.storage_backend, StorageBackend::InMemory);
    }
}
