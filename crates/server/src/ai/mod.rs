//! Clients for the external inference models

pub mod client;
pub mod ddx;
pub mod retry;
pub mod ttx;

pub use client::{ModelClient, ModelError};
pub use ddx::DiagnosisModel;
pub use retry::RetryPolicy;
pub use ttx::TreatmentModel;
