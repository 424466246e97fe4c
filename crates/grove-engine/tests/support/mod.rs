//! A recording fake of the toolkit's reflective surface.
//!
//! Every constructor and method call lands in a shared log as
//! `Class.method[args]` (constructors as `new Class/arity`), so tests can
//! assert which signatures the engine chose for a given version.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use grove_reflect::class::{ClassInfo, ClassRef, Instance, ObjectRef, Throwable};
use grove_reflect::context::{ClassContext, ClassContextFactory, ContextRef};
use grove_reflect::value::Value;
use grove_util::errors::GroveResult;

pub type CallLog = Arc<Mutex<Vec<String>>>;

const CC: &str = "org.codehaus.groovy.control.CompilerConfiguration";
const GCL: &str = "groovy.lang.GroovyClassLoader";
const LOADER: &str = "java.lang.ClassLoader";
const STRING: &str = "java.lang.String";
const STRINGS: &str = "java.lang.String[]";
const OBJECT: &str = "java.lang.Object";
const FILE: &str = "java.io.File";
const LIST: &str = "java.util.List";
const GROOVYDOC: &str = "org.codehaus.groovy.tools.groovydoc.";

/// How the fake toolkit should present itself.
#[derive(Debug, Clone)]
pub struct FakeToolkit {
    version: String,
    indy: bool,
    java: Option<String>,
    failing_compile: bool,
}

impl FakeToolkit {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            indy: false,
            java: Some("17.0.2".to_string()),
            failing_compile: false,
        }
    }

    pub fn indy(mut self) -> Self {
        self.indy = true;
        self
    }

    pub fn java(mut self, version: Option<&str>) -> Self {
        self.java = version.map(str::to_string);
        self
    }

    pub fn failing_compile(mut self) -> Self {
        self.failing_compile = true;
        self
    }

    pub fn factory(self) -> FakeFactory {
        FakeFactory {
            toolkit: self,
            log: CallLog::default(),
            created: AtomicUsize::new(0),
        }
    }
}

#[derive(Debug)]
pub struct FakeContext {
    classes: Vec<ClassRef>,
    classpath: Vec<PathBuf>,
    parent: Option<ContextRef>,
}

impl ClassContext for FakeContext {
    fn find_local_class(&self, name: &str) -> Option<ClassRef> {
        self.classes.iter().find(|c| c.name() == name).cloned()
    }

    fn find_local_resource(&self, _path: &str) -> Option<String> {
        None
    }

    fn parent(&self) -> Option<ContextRef> {
        self.parent.clone()
    }

    fn classpath(&self) -> &[PathBuf] {
        &self.classpath
    }
}

pub struct FakeFactory {
    toolkit: FakeToolkit,
    log: CallLog,
    created: AtomicUsize,
}

impl FakeFactory {
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Whether any call starts with `prefix`.
    pub fn called(&self, prefix: &str) -> bool {
        self.log.lock().unwrap().iter().any(|c| c.starts_with(prefix))
    }

    pub fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn contexts_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ClassContextFactory for FakeFactory {
    fn create(&self, classpath: &[PathBuf], parent: Option<ContextRef>) -> GroveResult<ContextRef> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeContext {
            classes: toolkit_classes(&self.toolkit, &self.log),
            classpath: classpath.to_vec(),
            parent,
        }))
    }

    fn host(&self) -> Option<ContextRef> {
        Some(Arc::new(FakeContext {
            classes: Vec::new(),
            classpath: Vec::new(),
            parent: None,
        }))
    }
}

fn simple_name(class: &str) -> &str {
    class.rsplit(['.', '$']).next().unwrap_or(class)
}

fn push(log: &CallLog, entry: String) {
    log.lock().unwrap().push(entry);
}

fn rec(
    log: &CallLog,
    label: String,
) -> impl Fn(&Value, &[Value]) -> Result<Value, Throwable> + Send + Sync + 'static {
    let log = log.clone();
    move |_, args| {
        push(&log, format!("{label}{args:?}"));
        Ok(Value::Null)
    }
}

fn rec_new(
    log: &CallLog,
    class: &str,
) -> impl Fn(&ObjectRef, &[Value]) -> Result<(), Throwable> + Send + Sync + 'static {
    let log = log.clone();
    let name = simple_name(class).to_string();
    move |_, args| {
        push(&log, format!("new {name}/{}", args.len()));
        Ok(())
    }
}

/// A class whose listed methods only record their calls.
fn recording_class(log: &CallLog, name: &str, ctors: &[&[&str]], methods: &[(&str, &[&str])]) -> ClassRef {
    let simple = simple_name(name);
    let mut builder = ClassInfo::builder(name);
    for params in ctors {
        builder = builder.constructor(params, rec_new(log, name));
    }
    for (method, params) in methods {
        builder = builder.method(method, params, rec(log, format!("{simple}.{method}")));
    }
    builder.build()
}

fn toolkit_classes(toolkit: &FakeToolkit, log: &CallLog) -> Vec<ClassRef> {
    let mut classes = Vec::new();

    let version = toolkit.version.clone();
    let version_log = log.clone();
    classes.push(
        ClassInfo::builder("groovy.lang.GroovySystem")
            .static_method("getVersion", &[], move |_, _| {
                push(&version_log, "GroovySystem.getVersion[]".to_string());
                Ok(Value::from(version.as_str()))
            })
            .build(),
    );
    if toolkit.indy {
        classes.push(ClassInfo::builder("org.codehaus.groovy.vmplugin.v8.IndyInterface").build());
    }

    let java = toolkit.java.clone();
    classes.push(
        ClassInfo::builder("java.lang.System")
            .static_method("getProperty", &[STRING], move |_, _| {
                Ok(java.clone().map_or(Value::Null, Value::from))
            })
            .static_method("setProperty", &[STRING, STRING], rec(log, "System.setProperty".to_string()))
            .build(),
    );

    classes.extend(compiler_classes(toolkit, log));
    classes.extend(doc_classes(log));
    classes
}

fn compiler_classes(toolkit: &FakeToolkit, log: &CallLog) -> Vec<ClassRef> {
    let options = recording_class(log, "java.util.HashMap", &[], &[("put", &[OBJECT, OBJECT])]);
    let customizers = recording_class(log, "java.util.ArrayList", &[], &[("add", &[OBJECT])]);

    let returns = |label: &'static str, class: &ClassRef| {
        let log = log.clone();
        let class = class.clone();
        move |_: &Value, _: &[Value]| -> Result<Value, Throwable> {
            push(&log, format!("CompilerConfiguration.{label}[]"));
            Ok(Value::Object(Instance::new(class.clone())))
        }
    };

    let mut cc = ClassInfo::builder(CC).constructor(&[], rec_new(log, CC));
    for (method, params) in [
        ("setDebug", "boolean"),
        ("setVerbose", "boolean"),
        ("setWarningLevel", "int"),
        ("setTolerance", "int"),
        ("setTargetBytecode", STRING),
        ("setSourceEncoding", STRING),
        ("setTargetDirectory", STRING),
        ("setPreviewFeatures", "boolean"),
        ("setParameters", "boolean"),
        ("setScriptExtensions", "java.util.Set"),
        ("setJointCompilationOptions", "java.util.Map"),
    ] {
        cc = cc.method(method, &[params], rec(log, format!("CompilerConfiguration.{method}")));
    }
    let cc = cc
        .method("getOptimizationOptions", &[], returns("getOptimizationOptions", &options))
        .method("getCompilationCustomizers", &[], returns("getCompilationCustomizers", &customizers))
        .build();

    let add_log = log.clone();
    let compile_log = log.clone();
    let classes_log = log.clone();
    let failing = toolkit.failing_compile;
    let unit = ClassInfo::builder("org.codehaus.groovy.control.CompilationUnit")
        .constructor(&[CC, "java.security.CodeSource", GCL, GCL], rec_new(log, "CompilationUnit"))
        .constructor(&[CC, "java.security.CodeSource", GCL], rec_new(log, "CompilationUnit"))
        .method("addSource", &[FILE], move |this, args| {
            push(&add_log, format!("CompilationUnit.addSource{args:?}"));
            if let Some(unit) = this.as_object() {
                unit.push("sources", args[0].clone());
            }
            Ok(Value::Null)
        })
        .method("compile", &[], move |_, _| {
            push(&compile_log, "CompilationUnit.compile[]".to_string());
            if failing {
                return Err(Throwable::new(
                    "org.codehaus.groovy.control.MultipleCompilationErrorsException",
                    "startup failed",
                ));
            }
            Ok(Value::Null)
        })
        .method("getClasses", &[], move |this, _| {
            push(&classes_log, "CompilationUnit.getClasses[]".to_string());
            let sources = this.as_object().and_then(|unit| unit.get("sources"));
            Ok(sources.unwrap_or(Value::List(Vec::new())))
        })
        .build();

    vec![
        options,
        customizers,
        cc,
        unit,
        recording_class(log, GCL, &[&[LOADER, CC], &[LOADER]], &[]),
        recording_class(
            log,
            "org.codehaus.groovy.tools.javac.JavaStubCompilationUnit",
            &[&[CC, GCL, FILE]],
            &[("addSource", &[FILE]), ("compile", &[])],
        ),
        recording_class(log, "groovy.lang.Binding", &[&[]], &[("setVariable", &[STRING, OBJECT])]),
        recording_class(
            log,
            "org.codehaus.groovy.control.customizers.ImportCustomizer",
            &[&[]],
            &[("addStaticStar", &[STRING])],
        ),
        recording_class(
            log,
            "groovy.lang.GroovyShell",
            &[&[LOADER, "groovy.lang.Binding", CC]],
            &[("evaluate", &[FILE])],
        ),
    ]
}

fn doc_classes(log: &CallLog) -> Vec<ClassRef> {
    let output_tool = ClassInfo::builder(format!("{GROOVYDOC}OutputTool")).interface().build();
    let resource_manager = ClassInfo::builder(format!("{GROOVYDOC}ResourceManager")).interface().build();
    let manager = format!("{GROOVYDOC}ResourceManager");
    let output = format!("{GROOVYDOC}OutputTool");

    let file_output_tool = ClassInfo::builder(format!("{GROOVYDOC}FileOutputTool"))
        .implements(output_tool.clone())
        .constructor(&[], rec_new(log, "FileOutputTool"))
        .build();
    let classpath_manager = ClassInfo::builder(format!("{GROOVYDOC}ClasspathResourceManager"))
        .implements(resource_manager.clone())
        .constructor(&[LOADER], rec_new(log, "ClasspathResourceManager"))
        .build();

    let m = manager.as_str();
    let doc_tool = recording_class(
        log,
        &format!("{GROOVYDOC}GroovyDocTool"),
        &[
            &[m, STRINGS, STRINGS, STRINGS, STRINGS, LIST, STRING, "java.util.Properties"],
            &[m, STRINGS, STRINGS, STRINGS, STRINGS, LIST, "java.util.Properties"],
            &[m, STRING, STRINGS, STRINGS, STRINGS, LIST],
            &[m, STRING, STRINGS, STRINGS, STRINGS],
        ],
        &[("add", &[LIST]), ("add", &[STRING]), ("renderToOutput", &[output.as_str(), STRING])],
    );

    let link_methods: &[(&str, &[&str])] = &[("setHref", &[STRING]), ("setPackages", &[STRING])];
    vec![
        output_tool,
        resource_manager,
        file_output_tool,
        classpath_manager,
        doc_tool,
        recording_class(log, &format!("{GROOVYDOC}LinkArgument"), &[&[]], link_methods),
        recording_class(log, "org.codehaus.groovy.ant.Groovydoc$LinkArgument", &[&[]], link_methods),
    ]
}

/// A throwaway directory holding a fake runtime executable at `bin/java`.
pub fn fake_java_home() -> tempfile::TempDir {
    let home = tempfile::tempdir().unwrap();
    let bin = home.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let exe = if cfg!(windows) { "java.exe" } else { "java" };
    std::fs::write(bin.join(exe), "").unwrap();
    home
}

pub fn file(path: &str) -> PathBuf {
    Path::new(path).to_path_buf()
}
