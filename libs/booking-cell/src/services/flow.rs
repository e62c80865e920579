// libs/booking-cell/src/services/flow.rs
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use availability_cell::{AvailabilityExpander, TimeOption};
use shared_config::AppConfig;
use shared_models::{Appointment, Schedule};

use crate::models::{BookingError, BookingPayload, ConfirmOutcome, FlowState, SelectionState};
use crate::services::conflict::ConflictGuard;
use crate::services::providers::{AppointmentProvider, BookingSubmitter, ScheduleProvider};

/// Orchestrates one booking interaction end to end: selection bookkeeping,
/// the duplicate/overlap pre-checks, submission, and cache refresh.
///
/// Owns the appointment and availability caches outright and hands them to
/// the pure cores by reference; both are refreshed wholesale, never patched
/// incrementally. Single-threaded by design: `Submitting` gates the one
/// in-flight request, and there is no way to start a second.
pub struct BookingFlow {
    schedules: Arc<dyn ScheduleProvider>,
    appointments: Arc<dyn AppointmentProvider>,
    submitter: Arc<dyn BookingSubmitter>,
    expander: AvailabilityExpander,
    guard: ConflictGuard,
    state: FlowState,
    selection: SelectionState,
    appointment_cache: Vec<Appointment>,
    availability_cache: HashMap<Uuid, Vec<Schedule>>,
    last_failure: Option<String>,
}

impl BookingFlow {
    pub fn new(
        config: &AppConfig,
        schedules: Arc<dyn ScheduleProvider>,
        appointments: Arc<dyn AppointmentProvider>,
        submitter: Arc<dyn BookingSubmitter>,
    ) -> Self {
        Self {
            schedules,
            appointments,
            submitter,
            expander: AvailabilityExpander::new(config.booking_lead_minutes),
            guard: ConflictGuard::new(),
            state: FlowState::Idle,
            selection: SelectionState::new(),
            appointment_cache: Vec::new(),
            availability_cache: HashMap::new(),
            last_failure: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// User-facing message from the most recent failed submission.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn my_appointments(&self) -> &[Appointment] {
        &self.appointment_cache
    }

    fn set_state(&mut self, next: FlowState) {
        debug!("booking flow {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Fill the appointment cache; called once after login and re-run
    /// wholesale after every successful booking or cancellation.
    pub async fn load_appointments(&mut self) -> Result<(), BookingError> {
        self.appointment_cache = self.appointments.get_my_appointments().await?;
        debug!("appointment cache holds {} entries", self.appointment_cache.len());
        Ok(())
    }

    /// Expand a doctor card: fetch availability (if not already cached) and
    /// start a selection for that doctor.
    pub async fn open_doctor(&mut self, doctor_id: Uuid) -> Result<(), BookingError> {
        if !self.availability_cache.contains_key(&doctor_id) {
            let fetched = self.schedules.get_available_slots(doctor_id).await?;
            self.availability_cache.insert(doctor_id, fetched);
        }
        self.selection.set_doctor(doctor_id);
        self.set_state(FlowState::AwaitingSelection);
        Ok(())
    }

    /// Collapse the card; abandons any in-progress selection.
    pub fn close(&mut self) {
        self.selection.clear();
        self.set_state(FlowState::Idle);
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        self.require_awaiting("select a date")?;
        if self.selection.doctor_id().is_none() {
            return Err(BookingError::InvalidSelection(
                "pick a doctor before choosing a date".to_string(),
            ));
        }
        self.selection.set_date(date);
        Ok(())
    }

    /// The bookable options for the current doctor/date selection, against
    /// the supplied wall clock.
    pub fn time_options(&self, today: NaiveDate, now_minutes: u32) -> Vec<TimeOption> {
        let (Some(doctor_id), Some(date)) = (self.selection.doctor_id(), self.selection.date())
        else {
            return Vec::new();
        };
        let schedules = self
            .availability_cache
            .get(&doctor_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        self.expander.expand(doctor_id, date, schedules, today, now_minutes)
    }

    /// Whether the user has already consumed this option; the UI renders
    /// such options disabled with a "Booked" marker.
    pub fn is_option_booked(&self, option: &TimeOption) -> bool {
        let (Some(doctor_id), Some(date)) = (self.selection.doctor_id(), self.selection.date())
        else {
            return false;
        };
        self.guard
            .is_option_already_booked(&self.appointment_cache, doctor_id, date, option)
    }

    pub fn select_option(&mut self, option: TimeOption) -> Result<(), BookingError> {
        self.require_awaiting("choose a time")?;
        if self.is_option_booked(&option) {
            return Err(BookingError::Conflict(
                "You already have a booking at this time.".to_string(),
            ));
        }
        self.selection.choose(option)
    }

    /// Run the confirmation gate: duplicate check first, then the overlap
    /// check and submission. A same-date appointment pauses the flow for
    /// explicit acknowledgement before anything is sent.
    pub async fn confirm(&mut self) -> Result<ConfirmOutcome, BookingError> {
        self.require_awaiting("confirm")?;
        if !self.selection.is_complete() {
            return Err(BookingError::InvalidSelection(
                "select a doctor, date and time before confirming".to_string(),
            ));
        }

        let (Some(doctor_id), Some(date)) = (self.selection.doctor_id(), self.selection.date())
        else {
            return Err(BookingError::InvalidSelection(
                "select a doctor, date and time before confirming".to_string(),
            ));
        };

        if let Some(existing) =
            self.guard
                .find_existing_same_date(&self.appointment_cache, doctor_id, date)
        {
            info!(
                "existing appointment {} on {} requires acknowledgement",
                existing.id, date
            );
            let warning = existing.clone();
            self.set_state(FlowState::DuplicateConfirmPending);
            return Ok(ConfirmOutcome::DuplicateWarning(warning));
        }

        self.submit_checked().await.map(ConfirmOutcome::Booked)
    }

    /// Proceed past the duplicate warning. Still subject to the overlap
    /// hard-block.
    pub async fn acknowledge_duplicate(&mut self) -> Result<Appointment, BookingError> {
        if self.state != FlowState::DuplicateConfirmPending {
            return Err(BookingError::InvalidSelection(
                "no duplicate confirmation is pending".to_string(),
            ));
        }
        self.submit_checked().await
    }

    /// Back out of the duplicate warning; nothing was sent.
    pub fn dismiss_duplicate(&mut self) {
        if self.state == FlowState::DuplicateConfirmPending {
            self.set_state(FlowState::AwaitingSelection);
        }
    }

    /// Cancel an existing appointment. Shares the wholesale cache-refresh
    /// contract with successful bookings.
    pub async fn cancel_appointment(&mut self, appointment_id: Uuid) -> Result<(), BookingError> {
        self.appointments.cancel(appointment_id).await?;
        info!("appointment {} canceled", appointment_id);
        self.refresh_caches(self.selection.doctor_id()).await;
        Ok(())
    }

    async fn submit_checked(&mut self) -> Result<Appointment, BookingError> {
        let (Some(doctor_id), Some(date), Some(option)) = (
            self.selection.doctor_id(),
            self.selection.date(),
            self.selection.chosen_option().cloned(),
        ) else {
            self.set_state(FlowState::AwaitingSelection);
            return Err(BookingError::InvalidSelection(
                "selection is no longer complete".to_string(),
            ));
        };

        if let Some(existing) = self.guard.find_time_overlap(
            &self.appointment_cache,
            doctor_id,
            date,
            &option.start_time,
            &option.end_time,
        ) {
            let window = availability_cell::timefmt::display_range(
                &existing.start_time,
                &existing.end_time,
            );
            self.set_state(FlowState::AwaitingSelection);
            return Err(BookingError::Conflict(format!(
                "This time overlaps your existing {} appointment.",
                window
            )));
        }

        self.set_state(FlowState::Submitting);
        let payload = BookingPayload::for_option(&option);

        match self.submitter.book(doctor_id, &payload).await {
            Ok(appointment) => {
                info!("booked appointment {} with doctor {}", appointment.id, doctor_id);
                self.set_state(FlowState::Succeeded);
                self.selection.clear();
                self.last_failure = None;
                self.refresh_caches(Some(doctor_id)).await;
                Ok(appointment)
            }
            Err(err) => {
                self.set_state(FlowState::Failed);
                self.last_failure = Some(err.user_message());
                warn!("booking rejected: {}", err);
                // Re-enterable immediately: selection is preserved so the
                // user can retry with a different time.
                self.set_state(FlowState::AwaitingSelection);
                Err(err)
            }
        }
    }

    /// Full re-fetch of the appointment cache and, when a doctor is open,
    /// that doctor's availability. Refresh failures are logged, not
    /// escalated; stale caches only weaken the optimistic pre-checks.
    async fn refresh_caches(&mut self, doctor_id: Option<Uuid>) {
        match self.appointments.get_my_appointments().await {
            Ok(fresh) => self.appointment_cache = fresh,
            Err(err) => warn!("appointment cache refresh failed: {}", err),
        }

        if let Some(doctor_id) = doctor_id {
            match self.schedules.get_available_slots(doctor_id).await {
                Ok(fresh) => {
                    self.availability_cache.insert(doctor_id, fresh);
                }
                Err(err) => warn!("availability cache refresh failed: {}", err),
            }
        }
    }

    fn require_awaiting(&self, action: &str) -> Result<(), BookingError> {
        match self.state {
            FlowState::AwaitingSelection => Ok(()),
            _ => Err(BookingError::InvalidSelection(format!(
                "cannot {} while the flow is {:?}",
                action, self.state
            ))),
        }
    }
}
