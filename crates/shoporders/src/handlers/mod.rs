pub mod error;
pub mod health;
pub mod orders;
pub mod products;
pub mod shops;
pub mod stats;

pub use error::AppError;
