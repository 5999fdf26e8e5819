//! Dorm Manager HTTP API.
//!
//! Exposes the application assembly for the binary and for integration
//! tests.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
