// libs/availability-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single offerable booking choice, derived from a schedule.
///
/// Recomputed on every expansion, never persisted; discarded whenever the
/// doctor or date selection changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeOption {
    /// Unique within a doctor+date: the slot's own id for fixed slots, a
    /// synthesized `range-{schedule_id}` for flexible ranges.
    pub id: String,
    pub schedule_id: Uuid,
    pub start_time: String,
    pub end_time: String,
    /// 12-hour "start - end" label, e.g. "8:00 AM - 12:00 PM".
    pub display_label: String,
    #[serde(flatten)]
    pub kind: TimeOptionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeOptionKind {
    FixedSlot { slot_id: Uuid },
    FlexibleRange { available_capacity: u32 },
}

impl TimeOption {
    pub fn is_flexible(&self) -> bool {
        matches!(self.kind, TimeOptionKind::FlexibleRange { .. })
    }
}
