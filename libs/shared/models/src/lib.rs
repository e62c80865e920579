pub mod appointment;
pub mod doctor;
pub mod schedule;

pub use appointment::{Appointment, AppointmentStatus};
pub use doctor::Doctor;
pub use schedule::{Schedule, ScheduleKind, TimeSlot};
