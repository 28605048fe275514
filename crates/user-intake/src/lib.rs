//! Registration workflow for client-backed user accounts.
//!
//! The [`registration`] module owns the eligibility pipeline and its collaborator
//! traits; [`config`], [`telemetry`] and [`error`] carry the ambient wiring shared
//! with the service binary.

pub mod config;
pub mod error;
pub mod registration;
pub mod telemetry;
