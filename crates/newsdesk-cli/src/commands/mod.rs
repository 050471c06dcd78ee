pub mod compose;
pub mod config;
pub mod draft_file;
pub mod newsletter;
pub mod prompt;
pub mod session;
