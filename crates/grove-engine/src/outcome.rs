use std::fmt;

use grove_core::task::TaskKind;
use grove_core::version::Version;

/// An optional capability that can be dropped without failing the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    InvokeDynamic,
    ParallelParsing,
    PreviewFeatures,
    Parameters,
    ConfigScript,
    ScriptExtensions,
    StubGeneration,
    Links,
    DocProperties,
    DocAnnotation,
    SourceDirectories,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvokeDynamic => "invokedynamic",
            Self::ParallelParsing => "parallel parsing",
            Self::PreviewFeatures => "preview features",
            Self::Parameters => "parameter metadata",
            Self::ConfigScript => "configuration script",
            Self::ScriptExtensions => "script extensions",
            Self::StubGeneration => "stub generation",
            Self::Links => "groovydoc links",
            Self::DocProperties => "groovydoc properties",
            Self::DocAnnotation => "groovydoc annotation",
            Self::SourceDirectories => "multiple source directories",
        };
        f.write_str(name)
    }
}

/// A requested feature the detected toolkit or runtime could not honour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedFeature {
    pub feature: Feature,
    pub message: String,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub kind: TaskKind,
    /// Absent when nothing ran, or when the task ran in a child process.
    pub version: Option<Version>,
    pub indy: bool,
    pub forked: bool,
    pub compiled_classes: Option<usize>,
    pub degraded: Vec<DegradedFeature>,
}

impl TaskOutcome {
    /// Outcome of a task with no inputs.
    pub fn skipped(kind: TaskKind) -> Self {
        Self {
            kind,
            version: None,
            indy: false,
            forked: false,
            compiled_classes: None,
            degraded: Vec::new(),
        }
    }

    /// Outcome of a task a child process completed.
    pub fn forked(kind: TaskKind) -> Self {
        Self {
            forked: true,
            ..Self::skipped(kind)
        }
    }

    pub fn is_degraded(&self, feature: Feature) -> bool {
        self.degraded.iter().any(|d| d.feature == feature)
    }
}
