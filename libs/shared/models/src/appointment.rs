// libs/shared/models/src/appointment.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A previously confirmed booking belonging to the current user.
///
/// Read-only to the booking core; only `scheduled` entries participate in
/// conflict checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Canceled,
    NoShow,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Canceled => write!(f, "canceled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_wire_spelling() {
        let status: AppointmentStatus = serde_json::from_str("\"no_show\"").unwrap();
        assert_eq!(status, AppointmentStatus::NoShow);
        assert_eq!(serde_json::to_string(&AppointmentStatus::Canceled).unwrap(), "\"canceled\"");
    }

    #[test]
    fn only_scheduled_counts_as_active() {
        let raw = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "doctor_id": "550e8400-e29b-41d4-a716-446655440001",
            "date": "2024-06-01",
            "start_time": "09:00",
            "end_time": "09:30",
            "status": "completed"
        });

        let appointment: Appointment = serde_json::from_value(raw).unwrap();
        assert!(!appointment.is_scheduled());
        assert!(appointment.doctor_name.is_none());
    }
}
