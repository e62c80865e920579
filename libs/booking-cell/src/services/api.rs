// libs/booking-cell/src/services/api.rs
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_backend::{BackendClient, BackendError};
use shared_models::{Appointment, Doctor, Schedule};

use crate::models::{BookingError, BookingPayload, RejectionCode};
use crate::services::providers::{
    AppointmentProvider, BookingSubmitter, DoctorProvider, ScheduleProvider,
};

/// REST implementation of the booking collaborators.
pub struct BookingApi {
    backend: Arc<BackendClient>,
}

impl BookingApi {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl DoctorProvider for BookingApi {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, BookingError> {
        self.backend
            .request(Method::GET, "/doctors/", None)
            .await
            .map_err(classify)
    }
}

#[async_trait]
impl ScheduleProvider for BookingApi {
    async fn get_available_slots(&self, doctor_id: Uuid) -> Result<Vec<Schedule>, BookingError> {
        debug!("fetching available slots for doctor {}", doctor_id);
        self.backend
            .request(
                Method::GET,
                &format!("/doctors/{}/available-slots/", doctor_id),
                None,
            )
            .await
            .map_err(classify)
    }
}

#[async_trait]
impl AppointmentProvider for BookingApi {
    async fn get_my_appointments(&self) -> Result<Vec<Appointment>, BookingError> {
        self.backend
            .request(Method::GET, "/appointment/my-appointments/", None)
            .await
            .map_err(classify)
    }

    async fn cancel(&self, appointment_id: Uuid) -> Result<(), BookingError> {
        let _: Value = self
            .backend
            .request(
                Method::POST,
                &format!("/appointment/cancel/{}/", appointment_id),
                None,
            )
            .await
            .map_err(classify)?;
        Ok(())
    }
}

#[async_trait]
impl BookingSubmitter for BookingApi {
    async fn book(
        &self,
        doctor_id: Uuid,
        payload: &BookingPayload,
    ) -> Result<Appointment, BookingError> {
        let body = serde_json::to_value(payload)
            .map_err(|e| BookingError::Backend(format!("unencodable payload: {}", e)))?;

        self.backend
            .request(
                Method::POST,
                &format!("/appointment/book/{}/", doctor_id),
                Some(body),
            )
            .await
            .map_err(classify)
    }
}

/// Map transport-layer failures onto the booking error taxonomy. Rejection
/// bodies carry `{ "message": ..., "error_code": ... }`; anything without a
/// recognizable shape becomes a generic backend error.
fn classify(err: BackendError) -> BookingError {
    match err {
        BackendError::Transport(e) => BookingError::Network(e.to_string()),
        BackendError::Api { status, body } => {
            if let Ok(value) = serde_json::from_str::<Value>(&body) {
                let message = value
                    .get("message")
                    .or_else(|| value.get("error"))
                    .and_then(Value::as_str)
                    .unwrap_or("booking request refused")
                    .to_string();

                if let Some(code) = value.get("error_code").and_then(Value::as_str) {
                    return BookingError::Rejected {
                        code: RejectionCode::from_wire(code),
                        message,
                    };
                }
                return BookingError::Backend(message);
            }
            BookingError::Backend(format!("status {}: {}", status, body))
        }
    }
}
