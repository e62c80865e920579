// libs/booking-cell/src/models.rs
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use availability_cell::{TimeOption, TimeOptionKind};
use shared_models::Appointment;

// ==============================================================================
// SELECTION STATE
// ==============================================================================

/// The user's in-progress doctor/date/time choice.
///
/// Fields are private so the invariant holds by construction: a chosen option
/// never outlives the doctor or date it was picked under.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    doctor_id: Option<Uuid>,
    date: Option<NaiveDate>,
    chosen_option: Option<TimeOption>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doctor_id(&self) -> Option<Uuid> {
        self.doctor_id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn chosen_option(&self) -> Option<&TimeOption> {
        self.chosen_option.as_ref()
    }

    /// Switching doctors discards the date and any chosen option.
    pub fn set_doctor(&mut self, doctor_id: Uuid) {
        if self.doctor_id != Some(doctor_id) {
            self.date = None;
            self.chosen_option = None;
        }
        self.doctor_id = Some(doctor_id);
    }

    /// Switching dates discards any chosen option.
    pub fn set_date(&mut self, date: NaiveDate) {
        if self.date != Some(date) {
            self.chosen_option = None;
        }
        self.date = Some(date);
    }

    pub fn choose(&mut self, option: TimeOption) -> Result<(), BookingError> {
        if self.doctor_id.is_none() || self.date.is_none() {
            return Err(BookingError::InvalidSelection(
                "pick a doctor and a date before choosing a time".to_string(),
            ));
        }
        self.chosen_option = Some(option);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.doctor_id.is_some() && self.date.is_some() && self.chosen_option.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ==============================================================================
// BOOKING PAYLOAD
// ==============================================================================

/// Request body for the book endpoint, shaped by the option kind.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum BookingPayload {
    FixedSlot {
        schedule_id: Uuid,
        time_slot_id: Uuid,
    },
    FlexibleRange {
        schedule_id: Uuid,
        start_time: String,
        end_time: String,
    },
}

impl BookingPayload {
    pub fn for_option(option: &TimeOption) -> Self {
        match option.kind {
            TimeOptionKind::FixedSlot { slot_id } => BookingPayload::FixedSlot {
                schedule_id: option.schedule_id,
                time_slot_id: slot_id,
            },
            TimeOptionKind::FlexibleRange { .. } => BookingPayload::FlexibleRange {
                schedule_id: option.schedule_id,
                start_time: option.start_time.clone(),
                end_time: option.end_time.clone(),
            },
        }
    }
}

// ==============================================================================
// FLOW STATE
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AwaitingSelection,
    DuplicateConfirmPending,
    Submitting,
    Succeeded,
    Failed,
}

/// What `confirm` resolved to when it did not fail outright.
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// An appointment with this doctor already exists on the chosen date;
    /// explicit acknowledgement is required before anything is sent.
    DuplicateWarning(Appointment),
    Booked(Appointment),
}

// ==============================================================================
// ERRORS
// ==============================================================================

/// Machine-readable rejection codes the server attaches to refused bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCode {
    DuplicateBooking,
    OverlappingAppointment,
    MaxAppointmentsReached,
    Unknown,
}

impl RejectionCode {
    pub fn from_wire(code: &str) -> Self {
        match code {
            "DUPLICATE_BOOKING" => RejectionCode::DuplicateBooking,
            "OVERLAPPING_APPOINTMENT" => RejectionCode::OverlappingAppointment,
            "MAX_APPOINTMENTS_REACHED" => RejectionCode::MaxAppointmentsReached,
            _ => RejectionCode::Unknown,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("booking rejected ({code:?}): {message}")]
    Rejected { code: RejectionCode, message: String },

    #[error("conflicts with an existing appointment: {0}")]
    Conflict(String),

    #[error("selection incomplete: {0}")]
    InvalidSelection(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl BookingError {
    /// The message shown to the user; server rejections with known codes get
    /// specific wording, everything else falls back to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Rejected { code, .. } => match code {
                RejectionCode::DuplicateBooking => {
                    "You already have an appointment at this exact time.".to_string()
                }
                RejectionCode::OverlappingAppointment => {
                    "This time overlaps one of your existing appointments.".to_string()
                }
                RejectionCode::MaxAppointmentsReached => {
                    "You have reached the appointment limit for this doctor on that day."
                        .to_string()
                }
                RejectionCode::Unknown => "Booking failed. Please try a different time.".to_string(),
            },
            BookingError::Conflict(detail) => detail.clone(),
            BookingError::InvalidSelection(detail) => detail.clone(),
            BookingError::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            BookingError::Backend(_) => "Booking failed. Please try again.".to_string(),
        }
    }
}
