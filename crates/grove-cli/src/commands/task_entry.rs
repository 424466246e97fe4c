use std::path::Path;

use miette::Result;

use grove_core::config::GlobalConfig;
use grove_engine::entry::run_from_file;
use grove_reflect::jar::JarContextFactory;

/// Run a task written by a forking parent, exiting with the task's status.
pub fn exec(config: &Path) -> Result<()> {
    let global = GlobalConfig::load()?;
    let host = global.fork.plugin_classpath.iter().map(Into::into).collect();
    let factory = JarContextFactory::new(host);

    let code = run_from_file(config, &factory);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
