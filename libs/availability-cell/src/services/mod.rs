pub mod expander;
pub mod timefmt;
