//! Domain layer for the Dorm Manager backend.
//!
//! This crate contains:
//! - Domain models (Dormitory, Student, AttendanceSchedule, ...)
//! - Pure business services: schedule window resolution, the attendance
//!   check-in/out state machine, and the tenancy guard
//! - Domain error types

pub mod models;
pub mod services;
