use std::path::PathBuf;

use miette::Result;

use grove_core::task::ClasspathInclusion;
use grove_reflect::jar::JarContextFactory;
use grove_reflect::locator::ToolkitLocator;

pub fn exec(classpath: &[PathBuf]) -> Result<()> {
    let factory = JarContextFactory::default();
    let locator = ToolkitLocator::new(&factory, classpath, ClasspathInclusion::ProjectOnly)?;
    let version = locator.version()?;

    if locator.is_indy_variant() {
        println!("Groovy {version} (indy)");
    } else {
        println!("Groovy {version}");
    }
    Ok(())
}
