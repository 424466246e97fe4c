//! Task descriptions handed to the engine.
//!
//! A task is built once by the caller and never mutated afterwards. The same
//! value is what gets written to disk when a task runs in a forked process,
//! so every type here is plain data with serde support.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use grove_util::errors::{GroveError, GroveResult};
use serde::{Deserialize, Serialize};

/// Which class-loading context the task's own context is parented on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClasspathInclusion {
    /// Only the project classpath; no parent context.
    #[default]
    ProjectOnly,
    /// The project classpath, parented on the engine's own context.
    ProjectAndPlugin,
    /// Only the engine's own context; the project classpath is ignored.
    PluginOnly,
}

impl fmt::Display for ClasspathInclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectOnly => write!(f, "project-only"),
            Self::ProjectAndPlugin => write!(f, "project-and-plugin"),
            Self::PluginOnly => write!(f, "plugin-only"),
        }
    }
}

/// Flags shared by compilation and stub generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompilerFlags {
    pub debug: bool,
    pub verbose: bool,
    pub warning_level: i32,
    pub tolerance: i32,
    pub target_bytecode: String,
    pub source_encoding: Option<String>,
    pub skip_bytecode_check: bool,
    pub script_extensions: BTreeSet<String>,
    pub include_classpath: ClasspathInclusion,
}

impl Default for CompilerFlags {
    fn default() -> Self {
        Self {
            debug: false,
            verbose: false,
            warning_level: 1,
            tolerance: 0,
            target_bytecode: "1.8".to_string(),
            source_encoding: None,
            skip_bytecode_check: false,
            script_extensions: BTreeSet::from(["groovy".to_string()]),
            include_classpath: ClasspathInclusion::default(),
        }
    }
}

/// Compile script sources to class files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompileTask {
    pub sources: BTreeSet<PathBuf>,
    pub classpath: Vec<PathBuf>,
    pub output_directory: PathBuf,
    pub flags: CompilerFlags,
    pub invoke_dynamic: bool,
    /// Unset means the toolkit default for the detected version.
    pub parallel_parsing: Option<bool>,
    pub preview_features: bool,
    pub parameters: bool,
    pub config_script: Option<PathBuf>,
}

/// Generate Java stubs for script sources, for joint compilation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StubTask {
    pub sources: BTreeSet<PathBuf>,
    pub classpath: Vec<PathBuf>,
    pub output_directory: PathBuf,
    pub flags: CompilerFlags,
}

/// Visibility level included in generated documentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocScope {
    Public,
    Protected,
    Package,
    #[default]
    Private,
}

impl DocScope {
    /// The doc properties switched on for this scope.
    pub fn property_key(&self) -> &'static str {
        match self {
            Self::Public => "publicScope",
            Self::Protected => "protectedScope",
            Self::Package => "packageScope",
            Self::Private => "privateScope",
        }
    }
}

/// A cross-reference to externally hosted documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Comma-separated package prefixes that resolve to `href`.
    pub packages: String,
    pub href: String,
}

/// A directory plus the documentable files found under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSourceSet {
    pub directory: PathBuf,
    /// Paths relative to `directory`.
    pub files: Vec<String>,
}

/// Presentation options for generated documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DocProperties {
    pub window_title: String,
    pub doc_title: String,
    pub footer: String,
    pub header: String,
    pub display_author: bool,
    pub overview_file: Option<PathBuf>,
    pub scope: DocScope,
}

impl Default for DocProperties {
    fn default() -> Self {
        Self {
            window_title: "Groovy Documentation".to_string(),
            doc_title: "Groovy Documentation".to_string(),
            footer: "Groovy Documentation".to_string(),
            header: "Groovy Documentation".to_string(),
            display_author: true,
            overview_file: None,
            scope: DocScope::default(),
        }
    }
}

/// Replacement template lists; unset lists use the version's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DocTemplates {
    pub doc: Option<Vec<String>>,
    pub package: Option<Vec<String>>,
    pub class: Option<Vec<String>>,
}

/// Fully-qualified names of the documentation tool classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DocToolClasses {
    pub doc_tool: String,
    pub output_tool: String,
    pub file_output_tool: String,
    pub resource_manager: String,
    pub classpath_resource_manager: String,
    /// Overrides the version-dependent link argument class.
    pub link_argument: Option<String>,
}

impl Default for DocToolClasses {
    fn default() -> Self {
        Self {
            doc_tool: "org.codehaus.groovy.tools.groovydoc.GroovyDocTool".to_string(),
            output_tool: "org.codehaus.groovy.tools.groovydoc.OutputTool".to_string(),
            file_output_tool: "org.codehaus.groovy.tools.groovydoc.FileOutputTool".to_string(),
            resource_manager: "org.codehaus.groovy.tools.groovydoc.ResourceManager".to_string(),
            classpath_resource_manager:
                "org.codehaus.groovy.tools.groovydoc.ClasspathResourceManager".to_string(),
            link_argument: None,
        }
    }
}

/// Generate HTML documentation for script and native sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DocTask {
    pub source_sets: Vec<DocSourceSet>,
    pub classpath: Vec<PathBuf>,
    pub output_directory: PathBuf,
    pub include_classpath: ClasspathInclusion,
    pub properties: DocProperties,
    pub links: Vec<Link>,
    pub templates: DocTemplates,
    pub tool_classes: DocToolClasses,
    pub language_level: Option<String>,
    pub attach_annotation: bool,
}

/// The kind of a task, for logging and outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Compile,
    Stub,
    Doc,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile => write!(f, "compile"),
            Self::Stub => write!(f, "stub"),
            Self::Doc => write!(f, "doc"),
        }
    }
}

/// One unit of work for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TaskConfiguration {
    Compile(CompileTask),
    Stub(StubTask),
    Doc(DocTask),
}

impl TaskConfiguration {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Compile(_) => TaskKind::Compile,
            Self::Stub(_) => TaskKind::Stub,
            Self::Doc(_) => TaskKind::Doc,
        }
    }

    pub fn classpath(&self) -> &[PathBuf] {
        match self {
            Self::Compile(t) => &t.classpath,
            Self::Stub(t) => &t.classpath,
            Self::Doc(t) => &t.classpath,
        }
    }

    pub fn include_classpath(&self) -> ClasspathInclusion {
        match self {
            Self::Compile(t) => t.flags.include_classpath,
            Self::Stub(t) => t.flags.include_classpath,
            Self::Doc(t) => t.include_classpath,
        }
    }

    /// Whether the task has nothing to process.
    pub fn has_no_inputs(&self) -> bool {
        match self {
            Self::Compile(t) => t.sources.is_empty(),
            Self::Stub(t) => t.sources.is_empty(),
            Self::Doc(t) => t.source_sets.iter().all(|set| set.files.is_empty()),
        }
    }

    /// Write the task as JSON.
    pub fn write_to(&self, path: &Path) -> GroveResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| GroveError::Serialization {
            message: format!("Failed to serialize {} task: {e}", self.kind()),
        })?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a task previously written with [`TaskConfiguration::write_to`].
    pub fn read_from(path: &Path) -> GroveResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GroveError::Serialization {
            message: format!("Failed to read task file {}: {e}", path.display()),
        })?;
        serde_json::from_str(&content).map_err(|e| GroveError::Serialization {
            message: format!("Failed to parse task file {}: {e}", path.display()),
        })
    }
}
