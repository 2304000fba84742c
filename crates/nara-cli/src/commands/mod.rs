//! Command implementations.

mod analyze;
mod id;
mod status;
mod story;
mod validate;

pub use analyze::AnalyzeCommand;
pub use id::IdCommand;
pub use status::StatusCommand;
pub use story::StoryCommand;
pub use validate::ValidateCommand;
