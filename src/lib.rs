pub mod api;
pub mod catalog;
pub mod entities;
pub mod middleware;
pub mod pricing;

pub use api::create_api_router;
