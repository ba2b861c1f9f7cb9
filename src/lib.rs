//! Downtime Cost Engine library crate.
//!
//! This crate exposes the validation and cost estimation engine for IT
//! service outages as reusable modules.  External applications may
//! depend on the `downtime_cost` crate and call `validate::validate`
//! followed by `engine::calculate` directly (or `engine::estimate`,
//! which does both), or embed the API via `api::build_router`.

pub mod models;
pub mod validate;
pub mod engine;
pub mod scenario;
pub mod report;
pub mod config;
pub mod api;

pub use engine::{calculate, estimate, estimate_batch};
pub use models::{Basis, CostBreakdown, RawInputs, ValidatedInputs};
pub use validate::{validate, Field, FieldError, ValidationErrors};
