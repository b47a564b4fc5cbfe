//! Roots command: list the entry points of a profile.

use crate::callgraph::Profile;
use crate::parser::{parse_file, ParserConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// Parse `input` and print every root function with its inclusive cost
pub fn list_roots(input: &Path, config: &ParserConfig) -> Result<()> {
    let profile = parse_file(input, config)
        .with_context(|| format!("Failed to parse profile {}", input.display()))?;

    println!("Roots of {}:", input.display());
    for line in format_roots(&profile) {
        println!("  {}", line);
    }

    Ok(())
}

/// One line per root: name, module and inclusive cost in milliseconds
pub fn format_roots(profile: &Profile) -> Vec<String> {
    profile
        .roots()
        .into_iter()
        .map(|root| {
            format!(
                "{} [{}] {:.3} ms",
                root.name,
                root.module.as_deref().unwrap_or("-"),
                root.inclusive_cost().as_secs_f64() * 1_000.0
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn test_format_roots() {
        let input = "\
events: usec
ob=/usr/bin/make
fn=a
1 1000
fn=b
1 2000
";
        let profile = parse_str(input).unwrap();
        let lines = format_roots(&profile);

        assert_eq!(lines, vec!["a [make] 1.000 ms", "b [make] 2.000 ms"]);
    }
}
