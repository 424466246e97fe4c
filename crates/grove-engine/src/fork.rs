//! Choosing between in-process and forked execution.
//!
//! A task forks when an alternate runtime home is configured or forking is
//! requested outright. The task is written to a temporary JSON file and a
//! child runtime is started on it with inherited standard I/O:
//!
//! ```text
//! <java> -cp <plugin artifacts>:<engine artifacts> <entry point> <task file>
//! ```
//!
//! A child that exits non-zero fails the task. The only fallback to
//! in-process execution is when no runtime executable can be found at all.

use std::path::{Path, PathBuf};

use grove_core::config::{ForkConfig, DEFAULT_ENTRY_POINT};
use grove_core::task::TaskConfiguration;
use grove_reflect::context::ClassContextFactory;
use grove_util::errors::{GroveError, GroveResult};
use grove_util::fs::{executable_name, find_on_path, to_classpath_string};
use grove_util::process::CommandBuilder;
use tracing::{debug, info, warn};

use crate::outcome::TaskOutcome;
use crate::{execute, ENTRY_LOCK};

/// How tasks should be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSettings {
    pub fork: bool,
    /// Home of an alternate runtime. Setting it implies forking.
    pub java_home: Option<PathBuf>,
    pub plugin_artifacts: Vec<PathBuf>,
    pub engine_artifacts: Vec<PathBuf>,
    pub entry_point: String,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            fork: false,
            java_home: None,
            plugin_artifacts: Vec::new(),
            engine_artifacts: Vec::new(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

impl From<&ForkConfig> for ExecutionSettings {
    fn from(config: &ForkConfig) -> Self {
        Self {
            fork: config.enabled,
            java_home: config.java_home.as_ref().map(PathBuf::from),
            plugin_artifacts: config.plugin_classpath.iter().map(PathBuf::from).collect(),
            engine_artifacts: config.engine_classpath.iter().map(PathBuf::from).collect(),
            entry_point: config.entry_point.clone(),
        }
    }
}

impl ExecutionSettings {
    pub fn should_fork(&self) -> bool {
        self.fork || self.java_home.is_some()
    }

    /// Classpath of the child: the plugin's artifacts, then the engine's.
    pub fn fork_classpath(&self) -> String {
        let elements: Vec<PathBuf> = self
            .plugin_artifacts
            .iter()
            .chain(&self.engine_artifacts)
            .cloned()
            .collect();
        to_classpath_string(&elements)
    }

    /// Locate the runtime executable.
    ///
    /// A configured home is the only candidate when set. Otherwise `JAVA_HOME`
    /// is tried, then `PATH`.
    pub fn java_executable(&self) -> Option<PathBuf> {
        let in_home = |home: &Path| {
            let candidate = home.join("bin").join(executable_name("java"));
            candidate.is_file().then_some(candidate)
        };

        if let Some(home) = &self.java_home {
            let java = in_home(home);
            if java.is_none() {
                debug!("no runtime executable under {}", home.display());
            }
            return java;
        }
        if let Some(home) = std::env::var_os("JAVA_HOME") {
            if let Some(java) = in_home(Path::new(&home)) {
                return Some(java);
            }
        }
        find_on_path("java")
    }
}

/// Starts child processes. Returns the exit code, or `None` if the child was killed by a signal.
pub trait ProcessLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> GroveResult<Option<i32>>;
}

/// Launches real processes with inherited standard I/O.
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> GroveResult<Option<i32>> {
        let status = CommandBuilder::new(program)
            .args(args)
            .status()?;
        Ok(status.code())
    }
}

/// Runs tasks in-process or in a child runtime, per [`ExecutionSettings`].
pub struct ExecutionModeSelector<'a> {
    settings: ExecutionSettings,
    factory: &'a dyn ClassContextFactory,
    launcher: Box<dyn ProcessLauncher + 'a>,
}

impl<'a> ExecutionModeSelector<'a> {
    pub fn new(settings: ExecutionSettings, factory: &'a dyn ClassContextFactory) -> Self {
        Self {
            settings,
            factory,
            launcher: Box::new(SystemLauncher),
        }
    }

    /// Replace the process launcher.
    pub fn with_launcher(mut self, launcher: impl ProcessLauncher + 'a) -> Self {
        self.launcher = Box::new(launcher);
        self
    }

    pub fn choose_and_run(&self, task: &TaskConfiguration) -> GroveResult<TaskOutcome> {
        let _guard = ENTRY_LOCK.lock();
        if !self.settings.should_fork() {
            return execute(task, self.factory);
        }

        match self.settings.java_executable() {
            Some(java) => self.fork(&java, task),
            None => {
                warn!("Unable to locate a Java executable for forking. Running in-process instead.");
                execute(task, self.factory)
            }
        }
    }

    fn fork(&self, java: &Path, task: &TaskConfiguration) -> GroveResult<TaskOutcome> {
        let file = tempfile::Builder::new()
            .prefix("grove-task-")
            .suffix(".json")
            .tempfile()?;
        task.write_to(file.path())?;

        let args = vec![
            "-cp".to_string(),
            self.settings.fork_classpath(),
            self.settings.entry_point.clone(),
            file.path().to_string_lossy().into_owned(),
        ];
        info!("Forking {} task with {}", task.kind(), java.display());
        let code = self.launcher.launch(java, &args)?;
        drop(file);

        match code {
            Some(0) => Ok(TaskOutcome::forked(task.kind())),
            code => Err(GroveError::ForkedExecutionFailed { code }),
        }
    }
}
