//! AWS-oriented adapters and handlers for sitemap generation.
//!
//! This crate owns runtime integration details (Lambda handlers, DynamoDB job
//! records and S3 artifact storage) on top of the pure `sitemap_core` crate.
//! Handlers only see the store traits in [`adapters`], so every workflow can
//! run against the in-memory adapters without live infrastructure.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
