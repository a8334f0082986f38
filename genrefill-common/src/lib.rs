//! # genrefill Common Library
//!
//! Shared code for the genrefill crates:
//! - Error types
//! - TOML configuration model and loading
//! - Credential and path resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
