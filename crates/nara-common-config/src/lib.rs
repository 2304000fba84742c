//! Configuration for Nara.
//!
//! Finds the narrative root of a repository and loads the layered
//! `nara.json` (project) and `.nara/config.json` (user) settings.

pub mod loader;
pub mod root;
pub mod types;

pub use loader::*;
pub use root::*;
pub use types::*;
