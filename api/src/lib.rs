//! # Turnstile API
//!
//! actix-web surface of the Turnstile server. Library exports exist so the
//! integration tests can build the same app the binary runs.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;
