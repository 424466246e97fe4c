//! `CompilerConfiguration` setup shared by compilation and stub generation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use grove_core::compat::translate_target;
use grove_core::task::CompilerFlags;
use grove_core::version::Version;
use grove_reflect::value::Value;
use grove_util::errors::GroveResult;
use tracing::{debug, info};

use crate::eras::{
    GROOVY_2_0_0_BETA3, GROOVY_2_1_0_BETA1, GROOVY_2_5_0_ALPHA1, GROOVY_2_5_7, GROOVY_3_0_0_BETA1,
};
use crate::outcome::Feature;
use crate::toolkit::Toolkit;

pub(crate) const COMPILER_CONFIGURATION: &str = "org.codehaus.groovy.control.CompilerConfiguration";
pub(crate) const GROOVY_CLASS_LOADER: &str = "groovy.lang.GroovyClassLoader";
const BINDING: &str = "groovy.lang.Binding";
const IMPORT_CUSTOMIZER: &str = "org.codehaus.groovy.control.customizers.ImportCustomizer";
const GROOVY_SHELL: &str = "groovy.lang.GroovyShell";
const CUSTOMIZATION_BUILDER: &str =
    "org.codehaus.groovy.control.customizers.builder.CompilerCustomizationBuilder";

pub(crate) const BOOLEAN: &str = "boolean";
pub(crate) const INT: &str = "int";
pub(crate) const STRING: &str = "java.lang.String";
pub(crate) const OBJECT: &str = "java.lang.Object";
pub(crate) const FILE: &str = "java.io.File";
pub(crate) const LIST: &str = "java.util.List";
pub(crate) const MAP: &str = "java.util.Map";
pub(crate) const SET: &str = "java.util.Set";
pub(crate) const CLASS_LOADER: &str = "java.lang.ClassLoader";

const JAVA_1_7: Version = Version::new(1, 7, 0);
const JAVA_1_8: Version = Version::new(1, 8, 0);
const JAVA_12: Version = Version::new(12, 0, 0);

pub(crate) fn new_configuration(toolkit: &Toolkit) -> GroveResult<Value> {
    toolkit.new_instance(COMPILER_CONFIGURATION, &[], Vec::new())
}

/// Apply the flags every task understands.
pub(crate) fn apply_flags(toolkit: &Toolkit, config: &Value, flags: &CompilerFlags) -> GroveResult<()> {
    toolkit.call(config, "setDebug", &[BOOLEAN], vec![flags.debug.into()])?;
    toolkit.call(config, "setVerbose", &[BOOLEAN], vec![flags.verbose.into()])?;
    toolkit.call(config, "setWarningLevel", &[INT], vec![flags.warning_level.into()])?;
    toolkit.call(config, "setTolerance", &[INT], vec![flags.tolerance.into()])?;
    toolkit.call(
        config,
        "setTargetBytecode",
        &[STRING],
        vec![translate_target(&flags.target_bytecode).into()],
    )?;
    if let Some(encoding) = &flags.source_encoding {
        toolkit.call(config, "setSourceEncoding", &[STRING], vec![encoding.as_str().into()])?;
    }
    Ok(())
}

fn put_optimization_option(toolkit: &Toolkit, config: &Value, key: &str, value: bool) -> GroveResult<()> {
    let options = toolkit.call(config, "getOptimizationOptions", &[], Vec::new())?;
    toolkit.call(&options, "put", &[OBJECT, OBJECT], vec![key.into(), value.into()])?;
    Ok(())
}

/// Evaluate a configuration script against `config`.
pub(crate) fn apply_config_script(toolkit: &mut Toolkit, config: &Value, script: &Path) -> GroveResult<()> {
    if !script.exists() {
        toolkit.degrade(
            Feature::ConfigScript,
            format!(
                "Configuration script file ({}) doesn't exist. Ignoring config-script.",
                script.display()
            ),
        );
        return Ok(());
    }
    if !toolkit.plan().config_script {
        toolkit.degrade(
            Feature::ConfigScript,
            format!(
                "Requested a configuration script, but your Groovy version ({}) doesn't support it (must be {GROOVY_2_1_0_BETA1} or newer). Ignoring config-script.",
                toolkit.version()
            ),
        );
        return Ok(());
    }

    let binding = toolkit.new_instance(BINDING, &[], Vec::new())?;
    toolkit.call(
        &binding,
        "setVariable",
        &[STRING, OBJECT],
        vec!["configuration".into(), config.clone()],
    )?;

    let shell_config = new_configuration(toolkit)?;
    let imports = toolkit.new_instance(IMPORT_CUSTOMIZER, &[], Vec::new())?;
    toolkit.call(&imports, "addStaticStar", &[STRING], vec![CUSTOMIZATION_BUILDER.into()])?;
    let customizers = toolkit.call(&shell_config, "getCompilationCustomizers", &[], Vec::new())?;
    toolkit.call(&customizers, "add", &[OBJECT], vec![imports])?;

    let shell = toolkit.new_instance(
        GROOVY_SHELL,
        &[CLASS_LOADER, BINDING, COMPILER_CONFIGURATION],
        vec![toolkit.loader(), binding, shell_config],
    )?;
    debug!("using configuration script {} for compilation", script.display());
    toolkit.call(&shell, "evaluate", &[FILE], vec![script.into()])?;
    Ok(())
}

pub(crate) fn apply_preview_features(toolkit: &mut Toolkit, config: &Value) -> GroveResult<()> {
    if !toolkit.runtime_at_least(&JAVA_12) {
        let message = format!(
            "Requested to use preview features, but your Java version ({}) doesn't support it. Ignoring preview-features.",
            toolkit.runtime_label()
        );
        toolkit.degrade(Feature::PreviewFeatures, message);
        return Ok(());
    }
    if !toolkit.plan().preview_features {
        let message = format!(
            "Requested to use preview features, but your Groovy version ({}) doesn't support it (must be {GROOVY_2_5_7}, or {GROOVY_3_0_0_BETA1} or newer; no 2.6 release supports it). Ignoring preview-features.",
            toolkit.version()
        );
        toolkit.degrade(Feature::PreviewFeatures, message);
        return Ok(());
    }
    toolkit.call(config, "setPreviewFeatures", &[BOOLEAN], vec![true.into()])?;
    Ok(())
}

pub(crate) fn apply_invoke_dynamic(toolkit: &mut Toolkit, config: &Value) -> GroveResult<()> {
    if !toolkit.plan().indy_requestable {
        let message = format!(
            "Requested to use invokedynamic, but your Groovy version ({}) doesn't support it (must be {GROOVY_2_0_0_BETA3} or newer). Ignoring invoke-dynamic.",
            toolkit.version()
        );
        toolkit.degrade(Feature::InvokeDynamic, message);
        return Ok(());
    }
    if !toolkit.is_indy_variant() {
        toolkit.degrade(
            Feature::InvokeDynamic,
            "Requested to use invokedynamic, but your Groovy version doesn't support it (must be the indy variant). Ignoring invoke-dynamic.".to_string(),
        );
        return Ok(());
    }
    if !toolkit.runtime_at_least(&JAVA_1_7) {
        let message = format!(
            "Requested to use invokedynamic, but your Java version ({}) doesn't support it. Ignoring invoke-dynamic.",
            toolkit.runtime_label()
        );
        toolkit.degrade(Feature::InvokeDynamic, message);
        return Ok(());
    }
    put_optimization_option(toolkit, config, "indy", true)?;
    put_optimization_option(toolkit, config, "int", false)?;
    info!("invokedynamic enabled.");
    Ok(())
}

pub(crate) fn apply_parameters(toolkit: &mut Toolkit, config: &Value) -> GroveResult<()> {
    if !toolkit.plan().parameters {
        let message = format!(
            "Requested to use parameters, but your Groovy version ({}) doesn't support it (must be {GROOVY_2_5_0_ALPHA1} or newer). Ignoring parameters.",
            toolkit.version()
        );
        toolkit.degrade(Feature::Parameters, message);
        return Ok(());
    }
    if !toolkit.runtime_at_least(&JAVA_1_8) {
        let message = format!(
            "Requested to use parameters, but your Java version ({}) doesn't support it. Ignoring parameters.",
            toolkit.runtime_label()
        );
        toolkit.degrade(Feature::Parameters, message);
        return Ok(());
    }
    toolkit.call(config, "setParameters", &[BOOLEAN], vec![true.into()])?;
    Ok(())
}

/// Turn parallel parsing on or off. Unset follows the toolkit's default.
pub(crate) fn apply_parallel_parsing(
    toolkit: &mut Toolkit,
    config: &Value,
    requested: Option<bool>,
) -> GroveResult<()> {
    let (supported, by_default) = {
        let plan = toolkit.plan();
        (plan.parallel_parsing, plan.parallel_parsing_by_default)
    };
    if !supported {
        if requested == Some(true) {
            let message = format!(
                "Requested to use parallel parsing, but your Groovy version ({}) doesn't support it. Ignoring parallel-parsing.",
                toolkit.version()
            );
            toolkit.degrade(Feature::ParallelParsing, message);
        }
        return Ok(());
    }

    if requested.unwrap_or(by_default) {
        put_optimization_option(toolkit, config, "parallelParse", true)?;
        info!("Parallel parsing enabled.");
    } else {
        info!("Parallel parsing disabled.");
    }
    Ok(())
}

/// Register the configured script extensions plus any found on `sources`.
///
/// Releases without custom extension support only see `.groovy` sources; a
/// non-default extension there is recorded as a degraded feature, not an error.
pub(crate) fn apply_script_extensions(
    toolkit: &mut Toolkit,
    config: &Value,
    flags: &CompilerFlags,
    sources: &BTreeSet<PathBuf>,
) -> GroveResult<()> {
    let mut extensions = flags.script_extensions.clone();
    extensions.extend(
        sources
            .iter()
            .filter_map(|s| s.extension())
            .map(|e| e.to_string_lossy().into_owned()),
    );
    debug!("detected script extensions: {extensions:?}");

    if toolkit.plan().script_extensions {
        let set = Value::List(extensions.iter().map(|e| Value::from(e.as_str())).collect());
        toolkit.call(config, "setScriptExtensions", &[SET], vec![set])?;
    } else if extensions.iter().any(|e| e != "groovy") {
        let message = format!(
            "Your Groovy version ({}) doesn't support custom script extensions. Only .groovy sources are recognised.",
            toolkit.version()
        );
        toolkit.degrade(Feature::ScriptExtensions, message);
    }
    Ok(())
}
