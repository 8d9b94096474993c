//! Core types and utilities for cross-chain bridge comparison
//!
//! This crate provides shared types used across all components:
//! - Chain identifiers and route requests
//! - Provider quotes and their unit normalization
//! - Comparison result types
//! - The bridge adapter contract
//! - Configuration and error types

pub mod types;
pub mod quotes;
pub mod metrics;
pub mod comparison;
pub mod adapter;
pub mod config;
pub mod errors;

#[cfg(feature = "testing")]
pub mod testing;

pub use types::*;
pub use quotes::*;
pub use metrics::*;
pub use comparison::*;
pub use adapter::*;
pub use config::*;
pub use errors::*;
