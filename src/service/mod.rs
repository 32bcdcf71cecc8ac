//! Service layer for the team-draw service
//!
//! Application state, the HTTP API, password checks, and health reporting.

pub mod api;
pub mod app;
pub mod auth;
pub mod health;

pub use api::{create_router, ApiError, ApiServer};
pub use app::{AppState, ServiceError};
pub use auth::{FilePasswordVerifier, PasswordVerifier, StaticPasswordVerifier};
pub use health::{HealthCheck, HealthStatus};
