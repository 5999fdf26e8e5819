//! Domain models.

pub mod attendance;
pub mod dormitory;
pub mod rfid;
pub mod room;
pub mod schedule;
pub mod student;
pub mod user;

pub use attendance::{
    Attendance, AttendanceRecord, AttendanceStatus, CreateAttendanceRequest, ScanRequest,
    ScanResponse, UpdateAttendanceRequest,
};
pub use dormitory::{CreateDormitoryRequest, Dormitory, UpdateDormitoryRequest};
pub use rfid::{RfidLog, UnknownRfid};
pub use room::{CreateRoomRequest, Room, UpdateRoomRequest};
pub use schedule::{
    AssignDevicesRequest, AttendanceSchedule, CreateScheduleRequest, UpdateScheduleRequest,
};
pub use student::{CreateStudentRequest, Student, UpdateStudentRequest};
pub use user::{
    CreateUserRequest, LoginRequest, RefreshRequest, RegisterRequest, TokenResponse,
    UpdateRoleRequest, User, UserRole,
};
