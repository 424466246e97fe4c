//! Class-loading contexts.
//!
//! A context resolves class and resource names against a fixed list of
//! classpath elements and may delegate to a parent first, the way the JVM's
//! class loaders do.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use grove_util::errors::GroveResult;

use crate::class::ClassRef;

pub type ContextRef = Arc<dyn ClassContext>;

/// An isolated namespace of classes and resources.
pub trait ClassContext: Send + Sync + fmt::Debug {
    /// Look up a class defined by this context's own classpath.
    fn find_local_class(&self, name: &str) -> Option<ClassRef>;

    /// Locate a resource in this context's own classpath, as a URL string.
    fn find_local_resource(&self, path: &str) -> Option<String>;

    fn parent(&self) -> Option<ContextRef>;

    /// The elements this context was scoped to.
    fn classpath(&self) -> &[PathBuf];

    /// Resolve a class, asking the parent first.
    fn load_class(&self, name: &str) -> Option<ClassRef> {
        self.parent()
            .and_then(|parent| parent.load_class(name))
            .or_else(|| self.find_local_class(name))
    }

    /// Resolve a resource, asking the parent first. A leading `/` is ignored.
    fn resource(&self, path: &str) -> Option<String> {
        let path = path.trim_start_matches('/');
        self.parent()
            .and_then(|parent| parent.resource(path))
            .or_else(|| self.find_local_resource(path))
    }
}

/// Creates the contexts tasks run in.
pub trait ClassContextFactory: Send + Sync {
    /// A fresh context scoped exactly to `classpath`.
    fn create(&self, classpath: &[PathBuf], parent: Option<ContextRef>) -> GroveResult<ContextRef>;

    /// The context the engine itself was loaded in, if there is one.
    fn host(&self) -> Option<ContextRef>;
}
