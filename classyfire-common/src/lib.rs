//! # ClassyFire Common Library
//!
//! Shared code for the ClassyFire client crates:
//! - Error and result types
//! - Configuration loading (TOML file, environment, compiled defaults)
//! - Cache database initialization

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
