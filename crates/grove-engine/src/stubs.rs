//! Java stub generation for joint compilation.

use std::collections::BTreeMap;

use grove_core::compat;
use grove_core::task::StubTask;
use grove_reflect::value::Value;
use grove_util::errors::GroveResult;
use tracing::{debug, error, info};

use crate::eras::GROOVY_1_8_2;
use crate::options::{self, CLASS_LOADER, COMPILER_CONFIGURATION, FILE, GROOVY_CLASS_LOADER, MAP};
use crate::outcome::Feature;
use crate::toolkit::Toolkit;

const STUB_COMPILATION_UNIT: &str = "org.codehaus.groovy.tools.javac.JavaStubCompilationUnit";

/// Write Java stubs for `task.sources` into `task.output_directory`.
///
/// Toolkits older than 1.8.2 cannot generate stubs; the task is then skipped
/// with an error logged rather than failed.
pub fn generate_stubs(toolkit: &mut Toolkit, task: &StubTask) -> GroveResult<()> {
    if task.sources.is_empty() {
        info!("No sources specified for stub generation. Skipping.");
        return Ok(());
    }
    if !toolkit.plan().stub_generation {
        let message = format!(
            "Your Groovy version ({}) doesn't support stub generation. The minimum version of Groovy required is {GROOVY_1_8_2}. Skipping stub generation.",
            toolkit.version()
        );
        error!("{message}");
        toolkit.record(Feature::StubGeneration, message);
        return Ok(());
    }
    if !task.flags.skip_bytecode_check {
        compat::verify(
            toolkit.version(),
            toolkit.is_indy_variant(),
            &task.flags.target_bytecode,
        )?;
    }

    let config = options::new_configuration(toolkit)?;
    options::apply_flags(toolkit, &config, &task.flags)?;
    let joint_options = BTreeMap::from([
        ("stubDir".to_string(), Value::File(task.output_directory.clone())),
        ("keepStubs".to_string(), Value::Bool(true)),
    ]);
    toolkit.call(
        &config,
        "setJointCompilationOptions",
        &[MAP],
        vec![Value::Map(joint_options)],
    )?;
    options::apply_script_extensions(toolkit, &config, &task.flags, &task.sources)?;

    let class_loader = toolkit.new_instance(
        GROOVY_CLASS_LOADER,
        &[CLASS_LOADER, COMPILER_CONFIGURATION],
        vec![toolkit.loader(), config.clone()],
    )?;
    let unit = toolkit.new_instance(
        STUB_COMPILATION_UNIT,
        &[COMPILER_CONFIGURATION, GROOVY_CLASS_LOADER, FILE],
        vec![config, class_loader, task.output_directory.as_path().into()],
    )?;

    for source in &task.sources {
        debug!("    {}", source.display());
        toolkit.call(&unit, "addSource", &[FILE], vec![source.as_path().into()])?;
    }
    toolkit.call(&unit, "compile", &[], Vec::new())?;
    info!("Generated stubs for {} source(s).", task.sources.len());
    Ok(())
}
