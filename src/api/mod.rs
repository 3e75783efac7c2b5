//! # API Layer
//!
//! External interfaces.
//!
//! - [`rest`]: HTTP endpoints using axum

pub mod rest;
