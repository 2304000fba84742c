//! Nara CLI Library
//!
//! Core library components for the `nara` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod stories;

pub use error::{CliError, Exit};
