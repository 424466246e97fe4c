//! Cargo-style status lines written to stderr.

use std::io::Write;

use console::Style;

fn line(style: Style, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        style.apply_to(label),
    );
}

/// Print an action line with a bold green label: `    Detected Groovy 4.0.21`
pub fn status(label: &str, message: &str) {
    line(Style::new().green().bold(), label, message);
}

/// Like [`status`] but uses bold cyan for informational lines.
pub fn status_info(label: &str, message: &str) {
    line(Style::new().cyan().bold(), label, message);
}

/// Print a warning line (bold yellow label), used for degraded features.
pub fn status_warn(label: &str, message: &str) {
    line(Style::new().yellow().bold(), label, message);
}
