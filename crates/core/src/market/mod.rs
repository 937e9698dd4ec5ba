//! Domain types for the marketplace: shops, products and orders.

mod requests;
mod token;
mod types;

pub use requests::{OrderItemRequest, PlaceOrder, ValidationError};
pub use token::{is_well_formed_token, new_shop_token, random_order_id};
pub use types::{Order, OrderLineItem, OrderStatus, Product, Shop};
