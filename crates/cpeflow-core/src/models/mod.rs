//! Data models for invoice records and pipeline configuration.

pub mod config;
pub mod invoice;
