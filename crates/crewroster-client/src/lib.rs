//! CLI, configuration and output rendering
//!
//! This crate provides the `crewroster` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
