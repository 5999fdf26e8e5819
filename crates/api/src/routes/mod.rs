//! HTTP route handlers.

pub mod attendance;
pub mod auth;
pub mod dormitories;
pub mod health;
pub mod rooms;
pub mod schedules;
pub mod students;
pub mod unknown_rfids;
pub mod users;
