pub mod ai;
pub mod cli;
pub mod config;
pub mod executor;
pub mod export;
pub mod logging;
pub mod orchestrator;
pub mod render;
pub mod repl;
pub mod session;
pub mod shell;
pub mod store;
pub mod theme;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::Config;
pub use executor::{CommandExecutor, Execution, ExecutionOutput, HandoffFile};
pub use orchestrator::{ActionResult, ExecuteRequest, Orchestrator};
pub use session::Session;
pub use shell::{ShellType, TargetOs};
