//! HTTP API handlers for revlist-web

pub mod health;
pub mod payments;
pub mod products;

pub use health::health_routes;
pub use payments::get_payment_status;
pub use products::get_product;
