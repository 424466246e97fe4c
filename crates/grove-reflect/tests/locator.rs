use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use grove_core::task::ClasspathInclusion;
use grove_core::version::Version;
use grove_reflect::class::{ClassInfo, ClassRef, Throwable};
use grove_reflect::context::{ClassContext, ClassContextFactory, ContextRef};
use grove_reflect::locator::{ToolkitLocator, LEGACY_VERSION_CLASS, MARKER_CLASS, VERSION_CLASS};
use grove_reflect::value::Value;
use grove_util::errors::{GroveError, GroveResult};

#[derive(Debug, Default)]
struct MapContext {
    classes: HashMap<String, ClassRef>,
    resources: HashMap<String, String>,
    parent: Option<ContextRef>,
    classpath: Vec<PathBuf>,
    lookups: Mutex<Vec<String>>,
}

impl MapContext {
    fn with_class(mut self, class: ClassRef) -> Self {
        self.classes.insert(class.name().to_string(), class);
        self
    }

    fn with_resource(mut self, path: &str, url: &str) -> Self {
        self.resources.insert(path.to_string(), url.to_string());
        self
    }

    fn looked_up(&self, name: &str) -> bool {
        self.lookups.lock().unwrap().iter().any(|n| n == name)
    }
}

impl ClassContext for MapContext {
    fn find_local_class(&self, name: &str) -> Option<ClassRef> {
        self.lookups.lock().unwrap().push(name.to_string());
        self.classes.get(name).cloned()
    }

    fn find_local_resource(&self, path: &str) -> Option<String> {
        self.resources.get(path).cloned()
    }

    fn parent(&self) -> Option<ContextRef> {
        self.parent.clone()
    }

    fn classpath(&self) -> &[PathBuf] {
        &self.classpath
    }
}

fn version_class(name: &str, version: &'static str) -> ClassRef {
    ClassInfo::builder(name)
        .static_method("getVersion", &[], move |_, _| Ok(Value::from(version)))
        .build()
}

#[test]
fn current_accessor_wins_and_stops_the_chain() {
    let ctx = Arc::new(
        MapContext::default()
            .with_class(version_class(VERSION_CLASS, "4.0.21"))
            .with_class(version_class(LEGACY_VERSION_CLASS, "1.0.0")),
    );
    let locator = ToolkitLocator::with_context(ctx.clone());
    assert_eq!(locator.version_string().unwrap(), "4.0.21");
    assert!(!ctx.looked_up(LEGACY_VERSION_CLASS));
    assert!(!ctx.looked_up(MARKER_CLASS));
}

#[test]
fn legacy_accessor_used_when_current_missing() {
    let ctx = Arc::new(MapContext::default().with_class(version_class(LEGACY_VERSION_CLASS, "1.7.10")));
    let locator = ToolkitLocator::with_context(ctx.clone());
    assert_eq!(locator.version_string().unwrap(), "1.7.10");
    assert!(ctx.looked_up(VERSION_CLASS));
    assert!(!ctx.looked_up(MARKER_CLASS));
}

#[test]
fn failing_current_accessor_falls_through() {
    let broken = ClassInfo::builder(VERSION_CLASS)
        .static_method("getVersion", &[], |_, _| {
            Err(Throwable::new("java.lang.NoClassDefFoundError", "missing"))
        })
        .build();
    let ctx = Arc::new(
        MapContext::default()
            .with_class(broken)
            .with_class(version_class(LEGACY_VERSION_CLASS, "1.8.9")),
    );
    assert_eq!(ToolkitLocator::with_context(ctx).version_string().unwrap(), "1.8.9");
}

#[test]
fn empty_legacy_result_falls_through_to_artifact() {
    let ctx = Arc::new(
        MapContext::default()
            .with_class(version_class(LEGACY_VERSION_CLASS, ""))
            .with_resource(
                "groovy/lang/GroovyObject.class",
                "jar:file:/repo/groovy-all-1.5.7.jar!/groovy/lang/GroovyObject.class",
            ),
    );
    assert_eq!(ToolkitLocator::with_context(ctx).version_string().unwrap(), "1.5.7");
}

#[test]
fn artifact_name_strips_variant_classifier() {
    let ctx = Arc::new(MapContext::default().with_resource(
        "groovy/lang/GroovyObject.class",
        "jar:file:/repo/lib/toolkit-core-2.4.0-indy.jar!/groovy/lang/GroovyObject.class",
    ));
    let locator = ToolkitLocator::with_context(ctx.clone());
    assert_eq!(locator.version_string().unwrap(), "2.4.0");
    assert!(ctx.looked_up(VERSION_CLASS));
    assert!(ctx.looked_up(LEGACY_VERSION_CLASS));
}

#[test]
fn code_source_used_when_resource_missing() {
    let marker = ClassInfo::builder(MARKER_CLASS)
        .code_source("/repo/groovy-2.0.0-beta-3.jar")
        .build();
    let ctx = Arc::new(MapContext::default().with_class(marker));
    let locator = ToolkitLocator::with_context(ctx);
    assert_eq!(locator.version().unwrap(), Version::tagged(2, 0, 0, "beta-3"));
}

#[test]
fn nothing_found_is_toolkit_not_found() {
    let locator = ToolkitLocator::with_context(Arc::new(MapContext::default()));
    let err = locator.version_string().unwrap_err();
    assert!(matches!(err, GroveError::ToolkitNotFound { .. }), "got: {err}");
}

#[test]
fn version_is_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let class = ClassInfo::builder(VERSION_CLASS)
        .static_method("getVersion", &[], move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::from("3.0.9"))
        })
        .build();
    let locator = ToolkitLocator::with_context(Arc::new(MapContext::default().with_class(class)));
    locator.version_string().unwrap();
    locator.version_string().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn indy_probe_checks_marker_classes() {
    let plain = ToolkitLocator::with_context(Arc::new(MapContext::default()));
    assert!(!plain.is_indy_variant());

    let indy = ToolkitLocator::with_context(Arc::new(MapContext::default().with_class(
        ClassInfo::builder("org.codehaus.groovy.vmplugin.v7.IndyInterface").build(),
    )));
    assert!(indy.is_indy_variant());
}

#[test]
fn runtime_version_from_system_property() {
    let system = ClassInfo::builder("java.lang.System")
        .static_method("getProperty", &["java.lang.String"], |_, args| {
            match args[0].as_str() {
                Some("java.version") => Ok(Value::from("17.0.2")),
                _ => Ok(Value::Null),
            }
        })
        .build();
    let locator = ToolkitLocator::with_context(Arc::new(MapContext::default().with_class(system)));
    assert_eq!(locator.runtime_version(), Some(Version::new(17, 0, 2)));

    let bare = ToolkitLocator::with_context(Arc::new(MapContext::default()));
    assert_eq!(bare.runtime_version(), None);
}

#[test]
fn parent_classes_shadow_local_ones() {
    let parent: ContextRef = Arc::new(MapContext::default().with_class(version_class(VERSION_CLASS, "2.5.0")));
    let child = MapContext {
        parent: Some(parent),
        ..Default::default()
    }
    .with_class(version_class(VERSION_CLASS, "4.0.0"));
    let locator = ToolkitLocator::with_context(Arc::new(child));
    assert_eq!(locator.version_string().unwrap(), "2.5.0");
}

#[derive(Default)]
struct RecordingFactory {
    created: Mutex<Vec<(Vec<PathBuf>, bool)>>,
}

impl ClassContextFactory for RecordingFactory {
    fn create(&self, classpath: &[PathBuf], parent: Option<ContextRef>) -> GroveResult<ContextRef> {
        self.created
            .lock()
            .unwrap()
            .push((classpath.to_vec(), parent.is_some()));
        Ok(Arc::new(MapContext {
            classpath: classpath.to_vec(),
            parent,
            ..Default::default()
        }))
    }

    fn host(&self) -> Option<ContextRef> {
        Some(Arc::new(MapContext::default()))
    }
}

#[test]
fn inclusion_mode_selects_parent_and_scope() {
    let factory = RecordingFactory::default();
    let classpath = vec![PathBuf::from("/repo/groovy-4.0.21.jar")];

    ToolkitLocator::new(&factory, &classpath, ClasspathInclusion::ProjectOnly).unwrap();
    ToolkitLocator::new(&factory, &classpath, ClasspathInclusion::ProjectAndPlugin).unwrap();
    let plugin_only =
        ToolkitLocator::new(&factory, &classpath, ClasspathInclusion::PluginOnly).unwrap();

    let created = factory.created.lock().unwrap();
    assert_eq!(created[0], (classpath.clone(), false));
    assert_eq!(created[1], (classpath.clone(), true));
    assert_eq!(created[2], (Vec::new(), true));
    assert!(plugin_only.context().classpath().is_empty());
}
