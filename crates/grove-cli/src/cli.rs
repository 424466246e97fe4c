//! CLI argument definitions for Grove.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "grove",
    version,
    about = "Drive whichever Groovy toolkit a classpath holds",
    long_about = "Grove detects the Groovy release on a classpath, checks bytecode targets against it \
                  and runs compile, stub and groovydoc tasks with the calls that release understands."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the Groovy version found on a classpath
    Detect {
        /// Classpath elements (jars or class directories)
        #[arg(short, long = "classpath", required = true, num_args = 1..)]
        classpath: Vec<PathBuf>,
    },

    /// Check that the Groovy on a classpath can emit a bytecode target
    Verify {
        /// Classpath elements (jars or class directories)
        #[arg(short, long = "classpath", required = true, num_args = 1..)]
        classpath: Vec<PathBuf>,
        /// Bytecode target (e.g. 1.8, 11, 17)
        #[arg(short, long)]
        target: String,
    },

    /// Run a task file
    Run {
        /// Path to a JSON task configuration
        task: PathBuf,
        /// Run the task in a separate Java process
        #[arg(long)]
        fork: bool,
        /// Java home to fork with (implies --fork)
        #[arg(long, env = "GROVE_JAVA_HOME")]
        java_home: Option<PathBuf>,
        /// Skip the bytecode target check
        #[arg(long)]
        skip_bytecode_check: bool,
    },

    /// List the bytecode targets and the Groovy releases that support them
    Targets,

    /// Run a task handed over by a parent process
    #[command(hide = true)]
    TaskEntry {
        /// Path to the serialized task configuration
        config: PathBuf,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
