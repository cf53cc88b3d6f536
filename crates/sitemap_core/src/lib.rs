//! Shared sitemap generation domain primitives.
//!
//! This crate owns deterministic behavior: request contracts and validation,
//! sitemap XML rendering, the job record state machine and storage key
//! derivation. It intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod job;
pub mod sitemap;
pub mod storage_keys;
