//! Nara story specification system.
//!
//! This crate parses story and manifest markdown, checks story identifiers,
//! reports story completeness, and gates generated content before it is
//! accepted. Everything here is synchronous and works on in-memory text.

pub mod analysis;
pub mod id;
pub mod parsing;
pub mod report;
pub mod story_types;
pub mod template;
pub mod validate;

pub use analysis::*;
pub use id::*;
pub use parsing::*;
pub use report::*;
pub use story_types::*;
pub use template::*;
pub use validate::*;
