// src/wp/mod.rs

//! WP-CLI process invocation.

pub mod backend;
pub mod invoker;

pub use backend::CliBackend;
pub use invoker::WpCli;
