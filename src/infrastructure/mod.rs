//! # Infrastructure Layer
//!
//! Adapters for the outside world.
//!
//! - [`vendors`]: Marketplace clients
//! - [`persistence`]: Snapshot and history stores
//! - [`enrichment`]: Specs summary sources

pub mod enrichment;
pub mod persistence;
pub mod vendors;
