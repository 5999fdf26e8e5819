//! Pure business services. No I/O; repositories hand these plain values.

pub mod attendance_state;
pub mod schedule_window;
pub mod tenancy;
