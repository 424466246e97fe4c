use std::path::PathBuf;

use miette::Result;

use grove_core::compat;
use grove_core::task::ClasspathInclusion;
use grove_reflect::jar::JarContextFactory;
use grove_reflect::locator::ToolkitLocator;
use grove_util::progress::status;

pub fn exec(classpath: &[PathBuf], target: &str) -> Result<()> {
    let factory = JarContextFactory::default();
    let locator = ToolkitLocator::new(&factory, classpath, ClasspathInclusion::ProjectOnly)?;
    let version = locator.version()?;
    let indy = locator.is_indy_variant();

    compat::verify(&version, indy, target)?;

    let variant = if indy { " (indy)" } else { "" };
    status(
        "Verified",
        &format!("Groovy {version}{variant} can target bytecode {target}"),
    );
    println!("{}", compat::translate_target(target));
    Ok(())
}
