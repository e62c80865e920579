// libs/booking-cell/src/services/providers.rs
use async_trait::async_trait;
use uuid::Uuid;

use shared_models::{Appointment, Doctor, Schedule};

use crate::models::{BookingError, BookingPayload};

/// Source of the bookable-doctor directory.
#[async_trait]
pub trait DoctorProvider: Send + Sync {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, BookingError>;
}

/// Source of a doctor's declared schedules, across all dates.
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    async fn get_available_slots(&self, doctor_id: Uuid) -> Result<Vec<Schedule>, BookingError>;
}

/// Source of the authenticated user's appointments. All statuses are
/// returned; callers filter to `scheduled` themselves.
#[async_trait]
pub trait AppointmentProvider: Send + Sync {
    async fn get_my_appointments(&self) -> Result<Vec<Appointment>, BookingError>;

    async fn cancel(&self, appointment_id: Uuid) -> Result<(), BookingError>;
}

/// One-shot booking submission; the server is the final authority on
/// conflicts regardless of any client-side pre-checks.
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    async fn book(
        &self,
        doctor_id: Uuid,
        payload: &BookingPayload,
    ) -> Result<Appointment, BookingError>;
}
