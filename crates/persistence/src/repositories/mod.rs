//! Repository implementations for database operations.

pub mod attendance;
pub mod dormitory;
pub mod rfid_log;
pub mod room;
pub mod schedule;
pub mod student;
pub mod unknown_rfid;
pub mod user;

pub use attendance::{AttendanceFilter, AttendanceRepository};
pub use dormitory::DormitoryRepository;
pub use rfid_log::RfidLogRepository;
pub use room::RoomRepository;
pub use schedule::ScheduleRepository;
pub use student::StudentRepository;
pub use unknown_rfid::UnknownRfidRepository;
pub use user::UserRepository;
