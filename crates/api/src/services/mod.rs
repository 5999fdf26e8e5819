//! Business services that orchestrate repositories and domain logic.

pub mod auth;
pub mod scan;

pub use auth::{AuthError, AuthService};
pub use scan::{ScanError, ScanService};
