//! Resume builder: per-user resume CRUD and AI-assisted content.

pub mod handlers;
pub mod prompts;
pub mod suggestions;

pub const DEFAULT_TEMPLATE: &str = "professional";
