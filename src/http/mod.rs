//! HTTP surface: router, health, static assets and dev live-reload

pub mod reload;
pub mod routes;

pub use routes::build_router;
