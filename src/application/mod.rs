//! # Application Layer
//!
//! Use cases on top of the domain and infrastructure layers.
//!
//! - [`services`]: Aggregation pipeline and its building blocks
//! - [`error`]: Application error types

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, InfrastructureError};
