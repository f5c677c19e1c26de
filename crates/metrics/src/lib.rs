//! Metrics collection and export for xid.
//!
//! This crate provides a unified metrics interface using the `metrics` crate facade.
//! When the `prometheus` feature is enabled, metrics are exported in Prometheus format.
//!
//! # Usage
//!
//! ```rust,ignore
//! use xid_metrics::{counter, crypto, labels};
//!
//! counter!(crypto::DECRYPTION_ERRORS_TOTAL, labels::KIND => "key_unknown").increment(1);
//! ```
//!
//! # Features
//!
//! - `prometheus`: Enable Prometheus text export through [`MetricsHandle::render`]

mod definitions;
mod error;
mod recorder;

pub use {
    definitions::*,
    error::{Error, Result},
    recorder::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
