pub mod api;
pub mod conflict;
pub mod flow;
pub mod providers;
