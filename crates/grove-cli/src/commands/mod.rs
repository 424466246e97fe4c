//! Command dispatch and handler modules.

mod detect;
mod run;
mod targets;
mod task_entry;
mod verify;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Detect { classpath } => detect::exec(&classpath),
        Command::Verify { classpath, target } => verify::exec(&classpath, &target),
        Command::Run {
            task,
            fork,
            java_home,
            skip_bytecode_check,
        } => run::exec(&task, fork, java_home, skip_bytecode_check),
        Command::Targets => targets::exec(),
        Command::TaskEntry { config } => task_entry::exec(&config),
    }
}
