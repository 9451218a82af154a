//! API Module
//!
//! HTTP handlers and routing for the render cache admin API.
//!
//! # Endpoints
//! - `GET /cache` - Cache stats and health
//! - `POST /cache` - Invalidate or warm up the cache
//! - `DELETE /cache` - Invalidate one template or all
//! - `POST /render` - Render a template through the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
