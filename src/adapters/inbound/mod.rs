mod cli;
mod report;

pub use cli::{prompt_target, Cli};
pub use report::{render, OutputFormat};
