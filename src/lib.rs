//! linkhint - preload/prefetch resource hints for built HTML documents.
//!
//! The [`hint`] module is the engine and can be used on its own with
//! in-memory outputs and documents. The rest drives it from a JSON build
//! manifest and a `linkhint.toml` config.

pub mod cli;
pub mod config;
pub mod hint;
pub mod logger;
pub mod manifest;
pub mod utils;
