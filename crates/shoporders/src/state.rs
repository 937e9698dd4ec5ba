//! Shared application state passed to all request handlers. Repository
//! trait objects keep handlers independent of the storage backend.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use shoporders_core::storage::{OrderRepository, ShopRepository, StatisticsRepository};

use crate::config::Config;
use crate::identity::{CognitoDirectory, StaticDirectory, UserDirectory};
use crate::storage::dynamodb::{DynamoDbRepository, TableClient};
use crate::storage::inmemory::InMemoryRepository;

#[derive(Clone)]
pub struct AppState {
    pub shops: Arc<dyn ShopRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub stats: Arc<dyn StatisticsRepository>,
    pub directory: Arc<dyn UserDirectory>,
}

impl AppState {
    /// Creates state over the DynamoDB backend, with a Cognito directory
    /// when a user pool is configured.
    pub async fn dynamodb(config: &Config) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let table = TableClient::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            config.table_name.clone(),
        );
        let repository = Arc::new(DynamoDbRepository::new(table));

        let directory: Arc<dyn UserDirectory> = match &config.user_pool_id {
            Some(pool_id) => Arc::new(CognitoDirectory::new(
                aws_sdk_cognitoidentityprovider::Client::new(&aws_config),
                pool_id.clone(),
            )),
            None => Arc::new(StaticDirectory::new()),
        };

        Self {
            shops: repository.clone(),
            orders: repository.clone(),
            stats: repository,
            directory,
        }
    }

    /// Creates state over the in-memory backend.
    pub fn inmemory() -> Self {
        let repository = Arc::new(InMemoryRepository::new());
        Self {
            shops: repository.clone(),
            orders: repository.clone(),
            stats: repository,
            directory: Arc::new(StaticDirectory::new()),
        }
    }

    pub fn with_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = directory;
        self
    }
}
