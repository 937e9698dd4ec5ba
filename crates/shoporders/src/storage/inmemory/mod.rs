//! In-memory backend for local development and tests. Mirrors the
//! DynamoDB backend's semantics without the table.

pub mod repository;

pub use repository::InMemoryRepository;
