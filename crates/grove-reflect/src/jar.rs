//! A class context backed by jar files and class directories.
//!
//! It answers "which classes and resources exist, and where" without executing
//! anything, which is enough to detect a toolkit, read its version from the
//! artifact name and probe for optional capabilities. Classes it returns have
//! no members.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use grove_util::errors::GroveResult;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::class::{ClassInfo, ClassRef};
use crate::context::{ClassContext, ClassContextFactory, ContextRef};

#[derive(Debug)]
enum Element {
    Archive { path: PathBuf, entries: HashSet<String> },
    Directory(PathBuf),
}

impl Element {
    fn open(path: &Path) -> Option<Self> {
        if path.is_dir() {
            return Some(Element::Directory(path.to_path_buf()));
        }
        if !path.is_file() {
            debug!("skipping missing classpath element {}", path.display());
            return None;
        }
        match read_entries(path) {
            Ok(entries) => Some(Element::Archive {
                path: path.to_path_buf(),
                entries,
            }),
            Err(e) => {
                warn!("ignoring unreadable classpath element {}: {e}", path.display());
                None
            }
        }
    }

    fn locate(&self, entry: &str) -> Option<String> {
        match self {
            Element::Archive { path, entries } => entries
                .contains(entry)
                .then(|| format!("jar:file:{}!/{entry}", path.display())),
            Element::Directory(dir) => {
                let file = dir.join(entry);
                file.is_file().then(|| format!("file:{}", file.display()))
            }
        }
    }
}

fn read_entries(path: &Path) -> Result<HashSet<String>, zip::result::ZipError> {
    let file = File::open(path)?;
    let archive = zip::ZipArchive::new(file)?;
    Ok(archive.file_names().map(str::to_string).collect())
}

fn class_entry(name: &str) -> String {
    format!("{}.class", name.replace('.', "/"))
}

/// Classpath index over jars and directories.
#[derive(Debug)]
pub struct JarContext {
    classpath: Vec<PathBuf>,
    elements: Vec<Element>,
    parent: Option<ContextRef>,
    loaded: Mutex<HashMap<String, ClassRef>>,
}

impl JarContext {
    /// Index `classpath`. Missing or unreadable elements are skipped, as the JVM does.
    pub fn open(classpath: &[PathBuf], parent: Option<ContextRef>) -> Self {
        let elements = classpath.iter().filter_map(|p| Element::open(p)).collect();
        Self {
            classpath: classpath.to_vec(),
            elements,
            parent,
            loaded: Mutex::new(HashMap::new()),
        }
    }
}

impl ClassContext for JarContext {
    fn find_local_class(&self, name: &str) -> Option<ClassRef> {
        if let Some(class) = self.loaded.lock().get(name) {
            return Some(class.clone());
        }

        let entry = class_entry(name);
        let location = self.elements.iter().find_map(|e| e.locate(&entry))?;
        let class = ClassInfo::builder(name).code_source(location).build();
        self.loaded.lock().insert(name.to_string(), class.clone());
        Some(class)
    }

    fn find_local_resource(&self, path: &str) -> Option<String> {
        self.elements.iter().find_map(|e| e.locate(path))
    }

    fn parent(&self) -> Option<ContextRef> {
        self.parent.clone()
    }

    fn classpath(&self) -> &[PathBuf] {
        &self.classpath
    }
}

/// Creates [`JarContext`]s, with an optional host classpath for the engine's own context.
#[derive(Debug, Default)]
pub struct JarContextFactory {
    host_classpath: Vec<PathBuf>,
}

impl JarContextFactory {
    pub fn new(host_classpath: Vec<PathBuf>) -> Self {
        Self { host_classpath }
    }
}

impl ClassContextFactory for JarContextFactory {
    fn create(&self, classpath: &[PathBuf], parent: Option<ContextRef>) -> GroveResult<ContextRef> {
        Ok(Arc::new(JarContext::open(classpath, parent)))
    }

    fn host(&self) -> Option<ContextRef> {
        if self.host_classpath.is_empty() {
            return None;
        }
        Some(Arc::new(JarContext::open(&self.host_classpath, None)))
    }
}
