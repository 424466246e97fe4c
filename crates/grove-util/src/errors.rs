use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Grove operations.
#[derive(Debug, Error, Diagnostic)]
pub enum GroveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A version string could not be parsed.
    #[error("Invalid version format '{input}': {reason}")]
    InvalidVersionFormat { input: String, reason: String },

    /// No usable toolkit was found on the supplied classpath.
    #[error("Toolkit not found: {message}")]
    #[diagnostic(help("Make sure a Groovy jar is present on the classpath"))]
    ToolkitNotFound { message: String },

    /// The detected toolkit cannot emit the requested bytecode target.
    #[error("Unsupported bytecode target '{target}': {message}")]
    #[diagnostic(help(
        "Upgrade the toolkit, lower the target, or set skip-bytecode-check to bypass the check"
    ))]
    UnsupportedBytecodeTarget { target: String, message: String },

    /// A class, constructor, method or field with the requested signature does not exist.
    #[error("Member not found: {message}")]
    MemberNotFound { message: String },

    /// A reflective request was malformed (wrong arity, null target, non-static call).
    #[error("Reflective usage error: {message}")]
    ReflectiveUsage { message: String },

    /// The toolkit's own code failed while being invoked.
    #[error("Invocation of {context} failed")]
    InvocationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A forked task process exited unsuccessfully.
    #[error("Forked execution failed{}", code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    #[diagnostic(help("See the forked process output above for details"))]
    ForkedExecutionFailed { code: Option<i32> },

    /// A task configuration could not be written or read.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// The global configuration file is invalid.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.grove/config.toml for syntax errors"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias used by the library crates.
pub type GroveResult<T> = Result<T, GroveError>;
