use console::style;
use miette::Result;

use grove_core::compat::RULES;

pub fn exec() -> Result<()> {
    println!("{}", style("Bytecode targets:").bold());
    for rule in RULES {
        let aliases = rule.targets.join(", ");
        let mut line = format!("  {aliases:<10} Groovy {}", rule.requirement());
        if rule.requires_indy_variant {
            line.push_str(", indy");
        }
        if let Some(ref dropped) = rule.dropped_in {
            line.push_str(&format!(", dropped in {dropped}"));
        }
        println!("{line}");
    }
    Ok(())
}
