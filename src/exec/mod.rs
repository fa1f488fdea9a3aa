// Command execution: tokenizing, wrapping for a target, spawning, capturing.

mod command;
mod lexer;
mod run;
mod runner;
mod target;
mod types;

pub use command::CommandLine;
pub use lexer::{LexError, split};
pub use runner::CommandRunner;
pub use target::ExecutionTarget;
pub use types::{Capture, ExecutionResult, RunOptions};
