//! Shared test fixtures for the OWS capabilities workspace.
//!
//! Provides captured-style capabilities documents for every supported
//! protocol, service exception documents, and CSW GetDomain responses.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::fixtures::capabilities;
//! ```

pub mod fixtures;

pub use fixtures::*;
