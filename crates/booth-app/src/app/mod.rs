pub mod ask;
pub mod history;
pub mod render;
pub mod repl;
pub mod setup;

pub use ask::run_ask_mode;
pub use history::run_history_command;
pub use repl::run_repl_mode;
pub use setup::{setup_from_cli, AppConfig};
