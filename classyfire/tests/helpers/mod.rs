//! Test Helper Utilities
//!
//! Shared utilities for testing classyfire

#![allow(dead_code)]

pub mod fake_transport;
pub mod fixtures;

pub use fake_transport::{FakeTransport, Reply};
pub use fixtures::{compound_json, unthrottled_config, test_client, ASPIRIN_INCHIKEY, ASPIRIN_SMILES};
