use std::path::PathBuf;

/// Platform separator between classpath elements.
pub const CLASSPATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// Join classpath elements into a single `-cp` argument.
pub fn to_classpath_string(elements: &[PathBuf]) -> String {
    elements
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(CLASSPATH_SEPARATOR)
}

/// Name of an executable with the platform suffix applied (`java` -> `java.exe`).
pub fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

/// Search the `PATH` environment variable for an executable file.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let exe = executable_name(name);
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(&exe))
        .find(|candidate| candidate.is_file())
}
