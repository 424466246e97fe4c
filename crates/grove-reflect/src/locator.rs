//! Locating the toolkit on a classpath and working out its version.

use std::path::PathBuf;
use std::sync::OnceLock;

use grove_core::task::ClasspathInclusion;
use grove_core::version::Version;
use grove_util::errors::{GroveError, GroveResult};
use tracing::debug;

use crate::class::ClassRef;
use crate::context::{ClassContextFactory, ContextRef};
use crate::invoker::{find_class, find_method, invoke_static_method};
use crate::value::Value;

/// Class exposing the current version accessor.
pub const VERSION_CLASS: &str = "groovy.lang.GroovySystem";
/// Class exposing the deprecated version accessor.
pub const LEGACY_VERSION_CLASS: &str = "org.codehaus.groovy.runtime.InvokerHelper";
/// A class every toolkit artifact contains.
pub const MARKER_CLASS: &str = "groovy.lang.GroovyObject";
const MARKER_RESOURCE: &str = "/groovy/lang/GroovyObject.class";
/// Classes only present in builds with dynamic call-site support.
pub const INDY_MARKER_CLASSES: [&str; 2] = [
    "org.codehaus.groovy.vmplugin.v8.IndyInterface",
    "org.codehaus.groovy.vmplugin.v7.IndyInterface",
];
/// Artifact classifiers that are not part of the version.
const VARIANT_SUFFIXES: [&str; 2] = ["-indy", "-grooid"];

/// An isolated class-loading context holding one toolkit.
#[derive(Debug)]
pub struct ToolkitLocator {
    context: ContextRef,
    version: OnceLock<Option<String>>,
}

impl ToolkitLocator {
    /// Build a fresh context for `classpath`, parented according to `inclusion`.
    pub fn new(
        factory: &dyn ClassContextFactory,
        classpath: &[PathBuf],
        inclusion: ClasspathInclusion,
    ) -> GroveResult<Self> {
        let context = match inclusion {
            ClasspathInclusion::ProjectOnly => factory.create(classpath, None)?,
            ClasspathInclusion::ProjectAndPlugin => factory.create(classpath, factory.host())?,
            ClasspathInclusion::PluginOnly => factory.create(&[], factory.host())?,
        };
        debug!(
            "created {inclusion} class context with {} element(s)",
            context.classpath().len()
        );
        Ok(Self::with_context(context))
    }

    pub fn with_context(context: ContextRef) -> Self {
        Self {
            context,
            version: OnceLock::new(),
        }
    }

    pub fn context(&self) -> &ContextRef {
        &self.context
    }

    /// Load a class from this locator's context.
    pub fn class(&self, name: &str) -> GroveResult<ClassRef> {
        find_class(self.context.as_ref(), name)
    }

    /// The toolkit's version string.
    ///
    /// Tries the current accessor, then the deprecated one, then the name of
    /// the artifact the marker class came from. The answer is cached.
    pub fn version_string(&self) -> GroveResult<String> {
        let detected = self.version.get_or_init(|| {
            current_accessor(&self.context)
                .or_else(|| legacy_accessor(&self.context))
                .or_else(|| artifact_version(&self.context))
        });
        detected.clone().ok_or_else(|| GroveError::ToolkitNotFound {
            message: "unable to determine the Groovy version, is Groovy on the classpath?"
                .to_string(),
        })
    }

    pub fn version(&self) -> GroveResult<Version> {
        Version::parse(&self.version_string()?)
    }

    /// Whether the toolkit build supports dynamic call sites.
    pub fn is_indy_variant(&self) -> bool {
        INDY_MARKER_CLASSES
            .iter()
            .any(|name| self.context.load_class(name).is_some())
    }

    /// Version of the runtime executing the toolkit, when it can be asked.
    pub fn runtime_version(&self) -> Option<Version> {
        let property = static_string_call(
            &self.context,
            "java.lang.System",
            "getProperty",
            &["java.lang.String"],
            vec![Value::from("java.version")],
        )?;
        Version::parse(&property).ok()
    }
}

fn static_string_call(
    context: &ContextRef,
    class_name: &str,
    method_name: &str,
    params: &[&str],
    args: Vec<Value>,
) -> Option<String> {
    let class = context.load_class(class_name)?;
    let method = find_method(&class, method_name, params).ok()?;
    match invoke_static_method(&method, args) {
        Ok(Value::Str(s)) if !s.is_empty() => Some(s),
        Ok(other) => {
            debug!("{class_name}.{method_name} returned {other:?}");
            None
        }
        Err(e) => {
            debug!("{class_name}.{method_name} failed: {e}");
            None
        }
    }
}

fn current_accessor(context: &ContextRef) -> Option<String> {
    static_string_call(context, VERSION_CLASS, "getVersion", &[], Vec::new())
}

fn legacy_accessor(context: &ContextRef) -> Option<String> {
    static_string_call(context, LEGACY_VERSION_CLASS, "getVersion", &[], Vec::new())
}

fn artifact_version(context: &ContextRef) -> Option<String> {
    let location = context.resource(MARKER_RESOURCE).or_else(|| {
        context
            .load_class(MARKER_CLASS)
            .and_then(|class| class.code_source().map(str::to_string))
    })?;
    let version = version_from_artifact(&location);
    debug!("toolkit artifact {location} gives version {version:?}");
    version
}

/// Pull a version out of an artifact location such as
/// `jar:file:/repo/groovy-all-2.4.0-indy.jar!/groovy/lang/GroovyObject.class`.
///
/// The version starts after the first `-` followed by a digit and runs up to
/// the four-character extension. Names with digits after an unrelated dash
/// (`my-2nd-groovy-2.4.0.jar`) are misread.
pub fn version_from_artifact(location: &str) -> Option<String> {
    let artifact = location.split('!').next()?;
    let file_name = artifact.rsplit(['/', '\\']).next()?;

    let bytes = file_name.as_bytes();
    let start = bytes
        .windows(2)
        .position(|w| w[0] == b'-' && w[1].is_ascii_digit())?
        + 1;
    let end = file_name.len().checked_sub(4)?;
    if start >= end {
        return None;
    }

    let mut version = file_name.get(start..end)?.to_string();
    for suffix in VARIANT_SUFFIXES {
        version = version.replace(suffix, "");
    }
    (!version.is_empty()).then_some(version)
}
