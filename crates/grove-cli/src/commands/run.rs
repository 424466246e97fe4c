use std::path::{Path, PathBuf};

use miette::Result;

use grove_core::config::GlobalConfig;
use grove_core::task::{CompileTask, CompilerFlags, StubTask, TaskConfiguration};
use grove_engine::fork::{ExecutionModeSelector, ExecutionSettings};
use grove_engine::outcome::TaskOutcome;
use grove_reflect::jar::JarContextFactory;
use grove_util::progress::{status, status_info, status_warn};

pub fn exec(
    task_path: &Path,
    fork: bool,
    java_home: Option<PathBuf>,
    skip_bytecode_check: bool,
) -> Result<()> {
    let config = GlobalConfig::load()?;
    let skip_check = skip_bytecode_check || config.compatibility.skip_bytecode_check;
    let task = load_task(task_path, skip_check)?;

    let mut settings = ExecutionSettings::from(&config.fork);
    settings.fork |= fork;
    if java_home.is_some() {
        settings.java_home = java_home;
    }
    tracing::debug!("execution settings: {settings:?}");

    let factory = JarContextFactory::new(settings.plugin_artifacts.clone());
    let selector = ExecutionModeSelector::new(settings, &factory);

    status("Running", &format!("{} task {}", task.kind(), task_path.display()));
    let outcome = selector.choose_and_run(&task)?;
    report(&outcome);
    Ok(())
}

/// Read the task file, turning the bytecode target check off when asked to.
fn load_task(path: &Path, skip_check: bool) -> Result<TaskConfiguration> {
    let task = TaskConfiguration::read_from(path)?;
    if !skip_check {
        return Ok(task);
    }

    let unchecked = |flags: CompilerFlags| CompilerFlags {
        skip_bytecode_check: true,
        ..flags
    };
    Ok(match task {
        TaskConfiguration::Compile(t) => TaskConfiguration::Compile(CompileTask {
            flags: unchecked(t.flags),
            ..t
        }),
        TaskConfiguration::Stub(t) => TaskConfiguration::Stub(StubTask {
            flags: unchecked(t.flags),
            ..t
        }),
        doc @ TaskConfiguration::Doc(_) => doc,
    })
}

fn report(outcome: &TaskOutcome) {
    for degraded in &outcome.degraded {
        status_warn("Degraded", &format!("{} was not applied", degraded.feature));
    }

    let kind = outcome.kind;
    if outcome.forked {
        status("Finished", &format!("{kind} task in a forked process"));
        return;
    }
    let Some(ref version) = outcome.version else {
        status_info("Skipped", &format!("{kind} task has no sources"));
        return;
    };

    let mut message = format!("{kind} task with Groovy {version}");
    if outcome.indy {
        message.push_str(" (indy)");
    }
    if let Some(count) = outcome.compiled_classes {
        message.push_str(&format!(", {count} class(es) compiled"));
    }
    status("Finished", &message);
}
