pub mod config_service;
pub mod json_entitlement_repository;
pub mod json_transcript_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::{ConfigService, StoragePaths};
pub use crate::json_entitlement_repository::JsonEntitlementRepository;
pub use crate::json_transcript_repository::JsonTranscriptRepository;
