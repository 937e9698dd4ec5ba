pub mod auth;
pub mod market;
pub mod serde;
pub mod storage;
