//! DynamoDB backend: one table, composite `PK`/`SK` keys, a shop index
//! (`GSI1`) and a customer index (`GSI2`).

pub mod client;
pub mod conversions;
pub mod error;
pub mod keys;
pub mod repository;

pub use client::TableClient;
pub use repository::DynamoDbRepository;
