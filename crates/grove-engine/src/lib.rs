//! Runs compile, stub and doc tasks against whichever toolkit release a
//! task's classpath holds.
//!
//! Every entry point funnels into one private executor guarded by a
//! process-wide lock, so at most one task drives a toolkit at a time.

pub mod compile;
pub mod doc;
pub mod entry;
pub mod eras;
pub mod fork;
mod options;
pub mod outcome;
pub mod stubs;
pub mod templates;
pub mod toolkit;

use grove_core::task::TaskConfiguration;
use grove_reflect::context::ClassContextFactory;
use grove_reflect::locator::ToolkitLocator;
use grove_util::errors::GroveResult;
use parking_lot::Mutex;
use tracing::info;

use crate::outcome::TaskOutcome;
use crate::toolkit::Toolkit;

static ENTRY_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Run `task` in this process, in a fresh class context built by `factory`.
pub fn run_in_process(
    task: &TaskConfiguration,
    factory: &dyn ClassContextFactory,
) -> GroveResult<TaskOutcome> {
    let _guard = ENTRY_LOCK.lock();
    execute(task, factory)
}

/// Callers must hold [`ENTRY_LOCK`].
fn execute(task: &TaskConfiguration, factory: &dyn ClassContextFactory) -> GroveResult<TaskOutcome> {
    let kind = task.kind();
    if task.has_no_inputs() {
        info!("No sources specified for {kind}. Skipping.");
        return Ok(TaskOutcome::skipped(kind));
    }

    let locator = ToolkitLocator::new(factory, task.classpath(), task.include_classpath())?;
    let mut toolkit = Toolkit::detect(locator)?;
    info!("Using Groovy {} to perform {kind}.", toolkit.version());

    let compiled = match task {
        TaskConfiguration::Compile(t) => Some(compile::compile(&mut toolkit, t)?),
        TaskConfiguration::Stub(t) => {
            stubs::generate_stubs(&mut toolkit, t)?;
            None
        }
        TaskConfiguration::Doc(t) => {
            doc::generate_doc(&mut toolkit, t)?;
            None
        }
    };
    Ok(toolkit.into_outcome(kind, compiled))
}
