//! GeoMint Core - Shared types library.
//!
//! This crate provides common types used across all GeoMint components:
//! - `server` - HTTP service exposing the catalogue, map, and claim views
//! - `integration-tests` - End-to-end tests against the router
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async runtime. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Domain model: NFTs, tasks, shops, and type-safe IDs
//! - [`geo`] - Coordinate type and distance math

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod geo;
pub mod types;

pub use geo::*;
pub use types::*;
