// libs/booking-cell/src/services/conflict.rs
use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use availability_cell::{timefmt, TimeOption};
use shared_models::Appointment;

/// Client-side duplicate and overlap detection over the user's cached
/// appointments.
///
/// Pure reads: the cache is supplied by the caller, nothing here mutates
/// state or touches the network. This is an optimistic UX aid; the server
/// re-validates every booking.
pub struct ConflictGuard;

impl ConflictGuard {
    pub fn new() -> Self {
        Self
    }

    /// First scheduled appointment with this doctor on this exact date, if
    /// any. Surfaced as a warning the user may override.
    pub fn find_existing_same_date<'a>(
        &self,
        appointments: &'a [Appointment],
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Option<&'a Appointment> {
        appointments
            .iter()
            .find(|apt| apt.is_scheduled() && apt.doctor_id == doctor_id && apt.date == date)
    }

    /// First scheduled appointment whose window overlaps the candidate under
    /// the half-open rule: `[s1, e1)` and `[s2, e2)` overlap iff
    /// `s1 < e2 && e1 > s2`. Touching windows do not overlap.
    pub fn find_time_overlap<'a>(
        &self,
        appointments: &'a [Appointment],
        doctor_id: Uuid,
        date: NaiveDate,
        candidate_start: &str,
        candidate_end: &str,
    ) -> Option<&'a Appointment> {
        let start = timefmt::minutes_since_midnight(candidate_start);
        let end = timefmt::minutes_since_midnight(candidate_end);

        let hit = appointments.iter().find(|apt| {
            if !apt.is_scheduled() || apt.doctor_id != doctor_id || apt.date != date {
                return false;
            }
            let existing_start = timefmt::minutes_since_midnight(&apt.start_time);
            let existing_end = timefmt::minutes_since_midnight(&apt.end_time);
            start < existing_end && end > existing_start
        });

        match hit {
            Some(apt) => {
                warn!(
                    "candidate {}-{} overlaps existing appointment {} ({}-{})",
                    candidate_start, candidate_end, apt.id, apt.start_time, apt.end_time
                );
            }
            None => {
                debug!(
                    "no overlap for doctor {} on {} at {}-{}",
                    doctor_id, date, candidate_start, candidate_end
                );
            }
        }

        hit
    }

    /// Whether a time option is already consumed by one of the user's own
    /// scheduled appointments. Used to mark options "Booked" in the UI.
    pub fn is_option_already_booked(
        &self,
        appointments: &[Appointment],
        doctor_id: Uuid,
        date: NaiveDate,
        option: &TimeOption,
    ) -> bool {
        self.find_time_overlap(appointments, doctor_id, date, &option.start_time, &option.end_time)
            .is_some()
    }
}

impl Default for ConflictGuard {
    fn default() -> Self {
        Self::new()
    }
}
