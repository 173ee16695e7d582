//! fedsql Common - Core types shared across all crates
//!
//! This crate provides the foundational types used throughout fedsql:
//! - `SqlType`: target types for CAST and CONVERT
//! - `Value`: constant representation, including bare keyword pseudo-arguments
//! - `Error`: unified error taxonomy
//! - `BuilderConfig`: limits and rendering defaults for expression building

pub mod config;
pub mod error;
pub mod types;
pub mod value;

pub use config::BuilderConfig;
pub use error::{Error, Result};
pub use types::SqlType;
pub use value::Value;
