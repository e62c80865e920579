pub mod client;

pub use client::{AuthTokens, BackendClient, BackendError};
