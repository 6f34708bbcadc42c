//! Command-line interface module.

mod args;
mod common;
pub mod inject;
pub mod plan;

pub use args::{Cli, Commands, HintArgs};
