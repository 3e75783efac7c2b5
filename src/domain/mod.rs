//! # Domain Layer
//!
//! Value objects, entities and invariant errors. No I/O happens here.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
