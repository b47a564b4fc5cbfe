//! Text summary of a parsed profile for terminal output.

use crate::callgraph::{Function, Profile};
use std::time::Duration;

/// Render the `max_lines` most expensive functions by self cost
///
/// Percentages are relative to the profile's declared total, or to the sum
/// of self costs when the profile declared none.
pub fn generate_text_summary(profile: &Profile, max_lines: usize) -> String {
    let mut functions: Vec<&Function> = profile.functions().collect();
    functions.sort_by(|a, b| b.cost.cmp(&a.cost).then_with(|| a.id.cmp(&b.id)));

    let total = if profile.total_cost.is_zero() {
        functions.iter().map(|f| f.cost).sum::<Duration>()
    } else {
        profile.total_cost
    };
    let total_nanos = total.as_nanos().max(1) as f64;

    let mut lines = Vec::new();
    lines.push("  FUNCTIONS BY SELF COST".to_string());
    lines.push(format!("  ┏{}┳{}┳{}┳{}┳{}┓", bar(42), bar(10), bar(14), bar(14), bar(9)));
    lines.push(format!(
        "  ┃ {:<40} ┃ {:^8} ┃ {:^12} ┃ {:^12} ┃ {:^7} ┃",
        "Function", "CALLED", "SELF (ms)", "TOTAL (ms)", "%"
    ));
    lines.push(format!("  ┣{}╋{}╋{}╋{}╋{}┫", bar(42), bar(10), bar(14), bar(14), bar(9)));

    for function in functions.iter().take(max_lines) {
        let percentage = function.cost.as_nanos() as f64 / total_nanos * 100.0;
        lines.push(format!(
            "  ┃ {:<40} ┃ {:>8} ┃ {:>12.3} ┃ {:>12.3} ┃ {:>6.1}% ┃",
            truncate(&function.name, 40),
            function.called,
            millis(function.cost),
            millis(function.inclusive_cost()),
            percentage
        ));
    }

    lines.push(format!("  ┗{}┻{}┻{}┻{}┻{}┛", bar(42), bar(10), bar(14), bar(14), bar(9)));

    let roots = profile.roots();
    lines.push(String::new());
    lines.push(format!(
        "  {} function(s), {} root(s), total {:.3} ms",
        profile.len(),
        roots.len(),
        millis(total)
    ));

    lines.join("\n")
}

fn bar(width: usize) -> String {
    "━".repeat(width)
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

/// Keep the tail of long names, which is usually the distinguishing part
fn truncate(name: &str, width: usize) -> String {
    let count = name.chars().count();
    if count <= width {
        return name.to_string();
    }

    let tail: String = name.chars().skip(count - (width - 3)).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn test_summary_orders_by_self_cost() {
        let input = "\
events: usec
fn=small
1 10
fn=large
1 90
";
        let profile = parse_str(input).unwrap();
        let summary = generate_text_summary(&profile, 10);

        let large = summary.find("large").unwrap();
        let small = summary.find("small").unwrap();
        assert!(large < small);
        assert!(summary.contains("90.0%"));
        assert!(summary.contains("2 function(s), 2 root(s)"));
    }

    #[test]
    fn test_truncate_keeps_tail() {
        let name = "a".repeat(50) + "tail";
        let shown = truncate(&name, 10);
        assert_eq!(shown, "...aaatail");
        assert_eq!(truncate("short", 10), "short");
    }
}
