//! HTTP API handlers for armory-dash

pub mod dashboard;
pub mod health;

pub use dashboard::{dashboard_routes, get_characters, get_dashboard, get_options, reload_cache};
pub use health::health_routes;
