//! Entitlement domain module.
//!
//! # Module Structure
//!
//! - `model`: Persisted premium flag and usage counter (`EntitlementRecord`)
//! - `gate`: Quota and unlock decisions (`EntitlementGate`)
//! - `repository`: Repository trait for entitlement persistence

mod gate;
mod model;
mod repository;

pub use gate::{Authorization, EntitlementGate, EntitlementPolicy, GateDecision};
pub use model::EntitlementRecord;
pub use repository::EntitlementRepository;
