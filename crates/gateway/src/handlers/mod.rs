//! HTTP handlers, one module per service.

pub mod action_handler;
pub mod city_handler;
pub mod contact_handler;
pub mod health_handler;
pub mod import_handler;
pub mod search_handler;

pub use action_handler::action_routes;
pub use city_handler::city_routes;
pub use contact_handler::{contact_routes, entity_routes};
pub use health_handler::health_routes;
pub use import_handler::import_routes;
pub use search_handler::search_routes;
