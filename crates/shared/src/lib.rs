//! Shared utilities and common types for the Dorm Manager backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT token generation and validation
//! - Wall-clock time and RFID tag validation
//! - Cursor pagination helpers

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
