pub mod models;
pub mod services;

pub use models::{TimeOption, TimeOptionKind};
pub use services::expander::AvailabilityExpander;
pub use services::timefmt;
