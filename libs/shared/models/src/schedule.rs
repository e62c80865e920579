// libs/shared/models/src/schedule.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of a doctor's declared availability.
///
/// The kind of a schedule is fixed at creation: either the doctor carved the
/// window into discrete slots, or left it as a flexible range with a booking
/// capacity. `available_capacity` on a range is authoritative only at fetch
/// time and may go stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(flatten)]
    pub kind: ScheduleKind,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "schedule_type")]
pub enum ScheduleKind {
    #[serde(rename = "slot-based")]
    FixedSlots { time_slots: Vec<TimeSlot> },
    #[serde(rename = "range-based")]
    FlexibleRange {
        start_time: String,
        end_time: String,
        available_capacity: u32,
    },
}

/// A single declared 30-minute slot inside a slot-based schedule.
///
/// Times arrive as 24h strings, "HH:MM" or "HH:MM:SS".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub start_time: String,
    pub end_time: String,
}
