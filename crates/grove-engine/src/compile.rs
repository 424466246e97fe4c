//! Compiling script sources to class files.

use grove_core::compat;
use grove_core::task::CompileTask;
use grove_reflect::value::Value;
use grove_util::errors::GroveResult;
use tracing::{debug, info};

use crate::eras::UnitConstructor;
use crate::options::{self, CLASS_LOADER, COMPILER_CONFIGURATION, FILE, GROOVY_CLASS_LOADER, STRING};
use crate::toolkit::Toolkit;

const COMPILATION_UNIT: &str = "org.codehaus.groovy.control.CompilationUnit";
const CODE_SOURCE: &str = "java.security.CodeSource";

/// Compile `task.sources` into `task.output_directory`. Returns the number of classes produced.
pub fn compile(toolkit: &mut Toolkit, task: &CompileTask) -> GroveResult<usize> {
    if task.sources.is_empty() {
        info!("No sources specified for compilation. Skipping.");
        return Ok(0);
    }
    if !task.flags.skip_bytecode_check {
        compat::verify(
            toolkit.version(),
            toolkit.is_indy_variant(),
            &task.flags.target_bytecode,
        )?;
    }

    let config = configure(toolkit, task)?;
    let class_loader = toolkit.new_instance(
        GROOVY_CLASS_LOADER,
        &[CLASS_LOADER, COMPILER_CONFIGURATION],
        vec![toolkit.loader(), config.clone()],
    )?;
    let transform_loader =
        toolkit.new_instance(GROOVY_CLASS_LOADER, &[CLASS_LOADER], vec![toolkit.loader()])?;

    let unit = match toolkit.plan().unit_constructor {
        UnitConstructor::WithTransformLoader => toolkit.new_instance(
            COMPILATION_UNIT,
            &[COMPILER_CONFIGURATION, CODE_SOURCE, GROOVY_CLASS_LOADER, GROOVY_CLASS_LOADER],
            vec![config, Value::Null, class_loader, transform_loader],
        )?,
        UnitConstructor::Basic => toolkit.new_instance(
            COMPILATION_UNIT,
            &[COMPILER_CONFIGURATION, CODE_SOURCE, GROOVY_CLASS_LOADER],
            vec![config, Value::Null, class_loader],
        )?,
    };

    debug!("adding {} source(s) to compile", task.sources.len());
    for source in &task.sources {
        debug!("    {}", source.display());
        toolkit.call(&unit, "addSource", &[FILE], vec![source.as_path().into()])?;
    }
    toolkit.call(&unit, "compile", &[], Vec::new())?;

    let classes = toolkit.call(&unit, "getClasses", &[], Vec::new())?;
    let count = classes.as_list().map_or(0, <[Value]>::len);
    info!("Compiled {count} file{}.", if count == 1 { "" } else { "s" });
    Ok(count)
}

fn configure(toolkit: &mut Toolkit, task: &CompileTask) -> GroveResult<Value> {
    let config = options::new_configuration(toolkit)?;
    if let Some(script) = &task.config_script {
        options::apply_config_script(toolkit, &config, script)?;
    }
    options::apply_flags(toolkit, &config, &task.flags)?;
    if task.preview_features {
        options::apply_preview_features(toolkit, &config)?;
    }

    let output = std::path::absolute(&task.output_directory)?;
    toolkit.call(
        &config,
        "setTargetDirectory",
        &[STRING],
        vec![output.to_string_lossy().into_owned().into()],
    )?;

    if task.invoke_dynamic || toolkit.plan().indy_by_default {
        options::apply_invoke_dynamic(toolkit, &config)?;
    }
    if task.parameters {
        options::apply_parameters(toolkit, &config)?;
    }
    options::apply_parallel_parsing(toolkit, &config, task.parallel_parsing)?;
    Ok(config)
}
