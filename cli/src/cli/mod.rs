// cli/src/cli/mod.rs

// Command line front-end: argument tree (`commands`), dispatch and context
// (`cli`), one handler per command (`handlers`, `handlers_admin`), terminal
// output (`render`), the persisted sign-in (`session_store`) and the shell
// (`interactive`).

pub mod cli;
pub mod commands;
pub mod handlers;
pub mod handlers_admin;
pub mod help_display;
pub mod interactive;
pub mod render;
pub mod session_store;

pub use cli::{dispatch, start_cli, CliContext};
pub use commands::{CliArgs, Commands};
pub use interactive::{parse_command, run_cli_interactive, CommandType};
pub use session_store::SessionStore;
