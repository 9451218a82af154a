//! Request and Response models for the render cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CacheAction, CacheActionRequest, CacheQuery, InvalidateQuery, RenderRequest};
pub use responses::{ActionResponse, CacheOverview, DataResponse, HealthResponse};
