pub mod config;
pub mod entitlement;
pub mod error;
pub mod generator;
pub mod session;

// Re-export common error type
pub use error::{Result, TenceError};
pub use generator::Generator;
