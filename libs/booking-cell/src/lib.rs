pub mod models;
pub mod services;

pub use models::{
    BookingError, BookingPayload, ConfirmOutcome, FlowState, RejectionCode, SelectionState,
};
pub use services::api::BookingApi;
pub use services::conflict::ConflictGuard;
pub use services::flow::BookingFlow;
pub use services::providers::{
    AppointmentProvider, BookingSubmitter, DoctorProvider, ScheduleProvider,
};
