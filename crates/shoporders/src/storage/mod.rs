pub mod dynamodb;
pub mod inmemory;
