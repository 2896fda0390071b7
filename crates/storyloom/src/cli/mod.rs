//! CLI command handlers.

mod chat;
mod commands;
mod repl;

pub use chat::run_chat;
pub use commands::{Cli, Commands};
