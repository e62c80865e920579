// libs/shared/models/src/doctor.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directory entry for a bookable doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub bio: String,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}
