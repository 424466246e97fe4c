//! Entry point of a forked task.

use std::error::Error;
use std::io::Write;
use std::path::Path;

use grove_core::task::TaskConfiguration;
use grove_reflect::context::ClassContextFactory;
use grove_util::errors::GroveError;
use tracing::info;

use crate::run_in_process;

/// Read the task written by the parent and run it here.
///
/// Returns the process exit code: 0 on success, 1 on any failure, with the
/// error chain written to stderr.
pub fn run_from_file(path: &Path, factory: &dyn ClassContextFactory) -> i32 {
    let result = TaskConfiguration::read_from(path).and_then(|task| run_in_process(&task, factory));
    match result {
        Ok(outcome) => {
            info!("forked {} task finished", outcome.kind);
            0
        }
        Err(e) => {
            report(&e);
            1
        }
    }
}

fn report(error: &GroveError) {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "error: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  caused by: {cause}");
        source = cause.source();
    }
}
