//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! together with the request/response types for the JSON API.

/// Data endpoint model (provider bindings)
pub mod endpoint;
/// User account model
pub mod user;
