// libs/availability-cell/src/services/expander.rs
use chrono::{Local, NaiveDate, Timelike};
use tracing::debug;
use uuid::Uuid;

use shared_models::{Schedule, ScheduleKind};

use crate::models::{TimeOption, TimeOptionKind};
use crate::services::timefmt;

/// Turns a doctor's raw schedule rows into the flat, future-filtered list of
/// bookable time options for one date.
///
/// Pure over its inputs: the caller supplies the schedule cache and the wall
/// clock, so expansion can be re-run on demand without I/O.
pub struct AvailabilityExpander {
    lead_minutes: u32,
}

impl Default for AvailabilityExpander {
    fn default() -> Self {
        Self::new(shared_config::DEFAULT_LEAD_MINUTES)
    }
}

impl AvailabilityExpander {
    pub fn new(lead_minutes: u32) -> Self {
        Self { lead_minutes }
    }

    /// Expand `schedules` into bookable options for `doctor_id` on `date`.
    ///
    /// Fixed slots come first, then flexible ranges, each group in schedule
    /// iteration order; there is no cross-kind chronological sort. When
    /// `date` is `today`, options starting within the lead window are
    /// dropped (strictly-greater-than comparison, so the exact boundary
    /// minute is excluded). Other dates are never time-filtered.
    pub fn expand(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        schedules: &[Schedule],
        today: NaiveDate,
        now_minutes: u32,
    ) -> Vec<TimeOption> {
        let cutoff = now_minutes.saturating_add(self.lead_minutes);
        let is_today = date == today;

        let for_date: Vec<&Schedule> = schedules
            .iter()
            .filter(|s| s.doctor_id == doctor_id && s.date == date && s.is_active)
            .collect();

        let mut fixed = Vec::new();
        let mut flexible = Vec::new();

        for schedule in &for_date {
            match &schedule.kind {
                ScheduleKind::FixedSlots { time_slots } => {
                    for slot in time_slots {
                        if is_today && timefmt::minutes_since_midnight(&slot.start_time) <= cutoff {
                            continue;
                        }
                        fixed.push(TimeOption {
                            id: slot.id.to_string(),
                            schedule_id: schedule.id,
                            start_time: slot.start_time.clone(),
                            end_time: slot.end_time.clone(),
                            display_label: timefmt::display_range(&slot.start_time, &slot.end_time),
                            kind: TimeOptionKind::FixedSlot { slot_id: slot.id },
                        });
                    }
                }
                ScheduleKind::FlexibleRange {
                    start_time,
                    end_time,
                    available_capacity,
                } => {
                    // Exhausted ranges disappear rather than render disabled.
                    if *available_capacity == 0 {
                        continue;
                    }
                    if is_today && timefmt::minutes_since_midnight(start_time) <= cutoff {
                        continue;
                    }
                    flexible.push(TimeOption {
                        id: format!("range-{}", schedule.id),
                        schedule_id: schedule.id,
                        start_time: start_time.clone(),
                        end_time: end_time.clone(),
                        display_label: timefmt::display_range(start_time, end_time),
                        kind: TimeOptionKind::FlexibleRange {
                            available_capacity: *available_capacity,
                        },
                    });
                }
            }
        }

        debug!(
            "expanded {} schedules into {} fixed + {} flexible options for doctor {} on {}",
            for_date.len(),
            fixed.len(),
            flexible.len(),
            doctor_id,
            date
        );

        fixed.extend(flexible);
        fixed
    }

    /// Expansion against the local wall clock, for callers outside tests.
    pub fn expand_today(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        schedules: &[Schedule],
    ) -> Vec<TimeOption> {
        let now = Local::now();
        let now_minutes = now.time().hour() * 60 + now.time().minute();
        self.expand(doctor_id, date, schedules, now.date_naive(), now_minutes)
    }
}
