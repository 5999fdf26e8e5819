//! Entity definitions: database row mappings.

pub mod attendance;
pub mod dormitory;
pub mod rfid_log;
pub mod room;
pub mod schedule;
pub mod student;
pub mod unknown_rfid;
pub mod user;

pub use attendance::{AttendanceEntity, AttendanceWithNamesEntity};
pub use dormitory::DormitoryEntity;
pub use rfid_log::RfidLogEntity;
pub use room::RoomEntity;
pub use schedule::ScheduleEntity;
pub use student::StudentEntity;
pub use unknown_rfid::UnknownRfidEntity;
pub use user::UserEntity;
