// src/errors.rs

//! Crate-wide error aliases.
//!
//! A thin wrapper around `anyhow`, kept as the single place to introduce
//! structured error types should the runner ever need to distinguish
//! upstream fault classes.

pub use anyhow::{Error, Result};
