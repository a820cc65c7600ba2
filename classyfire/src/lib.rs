//! ClassyFire client library
//!
//! Chemical taxonomy lookups against the ClassyFire web service by InChIKey
//! or SMILES: identifier validation, a persistent classification cache, a
//! rate-limited fetcher, a batch orchestrator that retries empty results at
//! the end of a batch, and a tabular adapter for delimited files.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod output;
pub mod services;

pub use client::ClassyFire;
pub use config::{ClientConfig, ConfigOverrides};
pub use error::{ClassyFireError, Result};
pub use models::{
    Classification, Compound, EmptyClassificationPolicy, FailurePolicy, Identifier,
    IdentifierKind,
};
