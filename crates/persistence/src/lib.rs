//! Persistence layer for the Dorm Manager backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations with explicit queries — repositories hand
//!   out plain entity values, never a lazily-fetched object graph

pub mod db;
pub mod entities;
pub mod repositories;
