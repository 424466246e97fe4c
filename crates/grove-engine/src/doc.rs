//! Groovydoc generation.
//!
//! The doc tool is driven the same way across releases: build a resource
//! manager and an output tool, construct `GroovyDocTool` with whatever its
//! constructor accepts at that version, register the sources, render. What
//! varies is captured by the task's [`CallPlan`](crate::eras::CallPlan).

use std::collections::BTreeMap;

use grove_core::task::{DocSourceSet, DocTask};
use grove_reflect::value::Value;
use grove_util::errors::GroveResult;
use tracing::{debug, info};

use crate::eras::{
    DocInput, DocToolConstructor, GROOVY_1_5_2, GROOVY_1_6_0_RC2, GROOVY_3_0_0_ALPHA4,
};
use crate::options::{CLASS_LOADER, LIST, STRING};
use crate::outcome::Feature;
use crate::toolkit::Toolkit;

const SYSTEM: &str = "java.lang.System";
const STRING_ARRAY: &str = "java.lang.String[]";
const PROPERTIES: &str = "java.util.Properties";

/// Generate documentation for `task.source_sets` into `task.output_directory`.
pub fn generate_doc(toolkit: &mut Toolkit, task: &DocTask) -> GroveResult<()> {
    if task.source_sets.is_empty() {
        info!("No source directories specified for GroovyDoc generation. Skipping.");
        return Ok(());
    }
    let classes = &task.tool_classes;

    if task.attach_annotation {
        attach_annotation(toolkit)?;
    }

    let output_tool = toolkit.new_instance(&classes.file_output_tool, &[], Vec::new())?;
    let resource_manager = toolkit.new_instance(
        &classes.classpath_resource_manager,
        &[CLASS_LOADER],
        vec![toolkit.loader()],
    )?;

    let links = links(toolkit, task)?;
    let properties = properties(task);
    if !toolkit.plan().doc_properties {
        let message = format!(
            "Your Groovy version ({}) doesn't support GroovyDoc documentation properties (window title, doc title, footer, header, author, overview file and scope). You need Groovy {GROOVY_1_6_0_RC2} or newer to support this. Ignoring properties.",
            toolkit.version()
        );
        toolkit.degrade(Feature::DocProperties, message);
    }

    let sources = order_sources(&task.source_sets);
    let doc_tool = construct_doc_tool(toolkit, task, resource_manager, links, properties)?;

    debug!("adding {} source(s) to generate GroovyDoc for", sources.len());
    match toolkit.plan().doc_input {
        DocInput::List => {
            let list = Value::List(sources.iter().map(|s| Value::from(s.as_str())).collect());
            toolkit.call(&doc_tool, "add", &[LIST], vec![list])?;
        }
        DocInput::PerSource => {
            for source in &sources {
                toolkit.call(&doc_tool, "add", &[STRING], vec![source.as_str().into()])?;
            }
        }
    }

    let output = std::path::absolute(&task.output_directory)?;
    toolkit.call(
        &doc_tool,
        "renderToOutput",
        &[classes.output_tool.as_str(), STRING],
        vec![output_tool, output.to_string_lossy().into_owned().into()],
    )?;
    info!("Generated GroovyDoc for {} source(s).", sources.len());
    Ok(())
}

fn attach_annotation(toolkit: &mut Toolkit) -> GroveResult<()> {
    if !toolkit.plan().doc_annotation {
        let message = format!(
            "Requested to attach the GroovyDoc annotation, but your Groovy version ({}) doesn't support it (must be {GROOVY_3_0_0_ALPHA4} or newer). Ignoring attach-annotation.",
            toolkit.version()
        );
        toolkit.degrade(Feature::DocAnnotation, message);
        return Ok(());
    }
    toolkit.call_static(
        SYSTEM,
        "setProperty",
        &[STRING, STRING],
        vec!["runtimeGroovydoc".into(), "true".into()],
    )?;
    Ok(())
}

fn links(toolkit: &mut Toolkit, task: &DocTask) -> GroveResult<Vec<Value>> {
    if task.links.is_empty() {
        return Ok(Vec::new());
    }
    let link_class = task
        .tool_classes
        .link_argument
        .as_deref()
        .or(toolkit.plan().link_class);
    let Some(link_class) = link_class else {
        let message = format!(
            "Requested to use GroovyDoc links, but your Groovy version ({}) doesn't support it (must be {GROOVY_1_5_2} or newer). Ignoring links.",
            toolkit.version()
        );
        toolkit.degrade(Feature::Links, message);
        return Ok(Vec::new());
    };

    task.links
        .iter()
        .map(|link| -> GroveResult<Value> {
            let argument = toolkit.new_instance(link_class, &[], Vec::new())?;
            toolkit.call(&argument, "setHref", &[STRING], vec![link.href.as_str().into()])?;
            toolkit.call(&argument, "setPackages", &[STRING], vec![link.packages.as_str().into()])?;
            Ok(argument)
        })
        .collect()
}

/// The properties passed to the doc tool.
pub fn properties(task: &DocTask) -> BTreeMap<String, Value> {
    let p = &task.properties;
    let overview = p
        .overview_file
        .as_ref()
        .and_then(|f| std::path::absolute(f).ok())
        .map_or_else(String::new, |f| f.to_string_lossy().into_owned());

    BTreeMap::from([
        ("windowTitle".to_string(), Value::from(p.window_title.as_str())),
        ("docTitle".to_string(), Value::from(p.doc_title.as_str())),
        ("footer".to_string(), Value::from(p.footer.as_str())),
        ("header".to_string(), Value::from(p.header.as_str())),
        ("author".to_string(), Value::from(p.display_author.to_string())),
        ("overviewFile".to_string(), Value::from(overview)),
        (p.scope.property_key().to_string(), Value::from("true")),
    ])
}

fn construct_doc_tool(
    toolkit: &mut Toolkit,
    task: &DocTask,
    resource_manager: Value,
    links: Vec<Value>,
    properties: BTreeMap<String, Value>,
) -> GroveResult<Value> {
    let layout = toolkit.plan().templates;
    let templates = &task.templates;
    let doc = templates.doc.clone().unwrap_or_else(|| layout.doc_templates());
    let package = templates.package.clone().unwrap_or_else(|| layout.package_templates());
    let class = templates.class.clone().unwrap_or_else(|| layout.class_templates());

    let directories: Vec<String> = task
        .source_sets
        .iter()
        .map(|set| set.directory.to_string_lossy().into_owned())
        .collect();

    let shape = toolkit.plan().doc_tool_constructor;
    let manager = task.tool_classes.resource_manager.as_str();
    let tool = task.tool_classes.doc_tool.as_str();
    let template_args = [Value::StrArray(doc), Value::StrArray(package), Value::StrArray(class)];

    if shape.single_source_dir() && directories.len() > 1 {
        let message = format!(
            "Your Groovy version ({}) doesn't support more than one GroovyDoc source directory (must be {GROOVY_1_6_0_RC2} or newer). Only using first source directory ({}).",
            toolkit.version(),
            directories[0]
        );
        toolkit.degrade(Feature::SourceDirectories, message);
    }

    let (mut params, mut args): (Vec<&str>, Vec<Value>) = if shape.single_source_dir() {
        let first = directories.into_iter().next().unwrap_or_default();
        (vec![manager, STRING], vec![resource_manager, first.into()])
    } else {
        (vec![manager, STRING_ARRAY], vec![resource_manager, Value::StrArray(directories)])
    };
    params.extend([STRING_ARRAY; 3]);
    args.extend(template_args);

    match shape {
        DocToolConstructor::WithLanguageLevel => {
            params.extend([LIST, STRING, PROPERTIES]);
            let level = task.language_level.clone().map_or(Value::Null, Value::from);
            args.extend([Value::List(links), level, Value::Map(properties)]);
        }
        DocToolConstructor::WithProperties => {
            params.extend([LIST, PROPERTIES]);
            args.extend([Value::List(links), Value::Map(properties)]);
        }
        DocToolConstructor::WithLinks => {
            params.push(LIST);
            args.push(Value::List(links));
        }
        DocToolConstructor::Basic => {}
    }
    debug_assert_eq!(params.len(), shape.arity());

    toolkit.new_instance(tool, &params, args)
}

/// Order doc inputs: native `.java` sources first, then script sources.
///
/// Duplicates are dropped. A `.java` source that sits where a script's stub
/// would be written (same path, `.java` extension) is dropped as well, since
/// it is that script's generated stub rather than a real source.
pub fn order_sources(source_sets: &[DocSourceSet]) -> Vec<String> {
    let mut native: Vec<&str> = Vec::new();
    let mut scripts: Vec<&str> = Vec::new();
    for source in source_sets.iter().flat_map(|set| set.files.iter()) {
        let bucket = if source.ends_with(".java") {
            &mut native
        } else {
            &mut scripts
        };
        if !bucket.contains(&source.as_str()) {
            bucket.push(source.as_str());
        }
    }

    let stubs: Vec<String> = scripts
        .iter()
        .filter_map(|s| s.rsplit_once('.'))
        .map(|(stem, _)| format!("{stem}.java"))
        .collect();

    native
        .into_iter()
        .filter(|s| !stubs.iter().any(|stub| stub == s))
        .chain(scripts)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn set(files: &[&str]) -> DocSourceSet {
        DocSourceSet {
            directory: PathBuf::from("/src"),
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn native_sources_come_first() {
        let sources = order_sources(&[set(&["a/B.groovy", "a/C.java", "a/D.gvy"])]);
        assert_eq!(sources, vec!["a/C.java", "a/B.groovy", "a/D.gvy"]);
    }

    #[test]
    fn stub_collisions_and_duplicates_are_dropped() {
        let sources = order_sources(&[
            set(&["a/B.groovy", "a/B.java", "a/C.java"]),
            set(&["a/C.java", "a/B.groovy"]),
        ]);
        assert_eq!(sources, vec!["a/C.java", "a/B.groovy"]);
    }

    #[test]
    fn properties_switch_on_the_scope() {
        let task = DocTask::default();
        let props = properties(&task);
        assert_eq!(props.get("privateScope").and_then(Value::as_str), Some("true"));
        assert_eq!(props.get("author").and_then(Value::as_str), Some("true"));
        assert_eq!(props.get("overviewFile").and_then(Value::as_str), Some(""));
    }
}
