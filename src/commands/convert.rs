//! Convert command implementation.
//!
//! The convert command:
//! 1. Parses the callgrind profile
//! 2. Picks the root function
//! 3. Lays out the interval tree
//! 4. Writes the JSON trace document

use crate::callgraph::{Function, Profile};
use crate::layout::{layout, LayoutConfig};
use crate::output::{generate_text_summary, to_document, trace_to_string, write_trace};
use crate::parser::{parse_file, ParserConfig};
use crate::utils::config::DEFAULT_SUMMARY_LINES;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the convert command
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Callgrind profile to read
    pub input: PathBuf,

    /// Output path for the JSON trace; stdout when absent
    pub output_json: Option<PathBuf>,

    /// Unix timestamp (seconds) the root interval starts at
    pub timestamp: i64,

    /// Root function name; the heaviest root when absent
    pub root: Option<String>,

    pub parser_config: ParserConfig,
    pub layout_config: LayoutConfig,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_json: Some(PathBuf::from("trace.json")),
            timestamp: Utc::now().timestamp(),
            root: None,
            parser_config: ParserConfig::default(),
            layout_config: LayoutConfig::default(),
            print_summary: false,
        }
    }
}

/// Execute the convert command
///
/// # Errors
/// * Profile read or parse failures
/// * Unknown root function, or a profile with no root at all
/// * File write errors
pub fn execute_convert(args: ConvertArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Converting profile: {}", args.input.display());

    info!("Step 1/3: Parsing profile...");
    let profile = parse_file(&args.input, &args.parser_config)
        .with_context(|| format!("Failed to parse profile {}", args.input.display()))?;

    debug!(
        "Parsed profile: {} functions, total cost {:?}",
        profile.len(),
        profile.total_cost
    );

    let root = select_root(&profile, args.root.as_deref())?;
    info!("Root function: {}", root.name);

    info!("Step 2/3: Laying out intervals...");
    let start = DateTime::<Utc>::from_timestamp(args.timestamp, 0)
        .with_context(|| format!("Timestamp out of range: {}", args.timestamp))?;
    let intervals = layout(&profile, start, root, &args.layout_config);

    info!("Step 3/3: Writing trace...");
    let source = args.input.display().to_string();
    let document = to_document(&source, &profile, &root.name, &intervals);

    match &args.output_json {
        Some(path) => {
            write_trace(&document, path).context("Failed to write trace JSON")?;
            info!("✓ Trace written to: {}", path.display());
        }
        None => {
            println!("{}", trace_to_string(&document).context("Failed to serialize trace")?);
        }
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("PROFILE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Source:    {}", source);
        if let Some(command) = &profile.command {
            println!("Command:   {}", command);
        }
        println!("Root:      {}", root.name);
        println!("Intervals: {}", intervals.len());
        println!("\n{}", generate_text_summary(&profile, DEFAULT_SUMMARY_LINES));
        println!("{}", "=".repeat(80));
    }

    info!(
        "Conversion completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Pick the function to start the layout from
///
/// A named root must exist in the profile (it does not have to be a
/// root in the graph sense). Without a name the heaviest root is used.
pub fn select_root<'a>(profile: &'a Profile, name: Option<&str>) -> Result<&'a Function> {
    if let Some(name) = name {
        return profile
            .functions()
            .find(|f| f.name == name)
            .with_context(|| format!("Function '{}' not found in profile", name));
    }

    let roots = profile.roots();
    if roots.len() > 1 {
        warn!(
            "Profile has {} roots, using the heaviest; pass --root to choose",
            roots.len()
        );
    }

    profile
        .heaviest_root()
        .context("Profile has no root function (every function is called)")
}

/// Validate convert arguments
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input profile path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input profile not found: {}", args.input.display());
    }

    if let Some(root) = &args.root {
        if root.trim().is_empty() {
            anyhow::bail!("Root function name cannot be empty");
        }
    }

    if DateTime::<Utc>::from_timestamp(args.timestamp, 0).is_none() {
        anyhow::bail!("Timestamp out of range: {}", args.timestamp);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PROFILE: &str = "\
events: usec
fn=main
1 10
cfn=child
calls=1 0
2 40
fn=other
1 5
";

    fn profile_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PROFILE.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_select_root_defaults_to_heaviest() {
        let profile = parse_str(PROFILE).unwrap();
        assert_eq!(select_root(&profile, None).unwrap().name, "main");
    }

    #[test]
    fn test_select_root_by_name() {
        let profile = parse_str(PROFILE).unwrap();
        assert_eq!(select_root(&profile, Some("child")).unwrap().name, "child");
        assert!(select_root(&profile, Some("missing")).is_err());
    }

    #[test]
    fn test_validate_args_valid() {
        let file = profile_file();
        let args = ConvertArgs {
            input: file.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        assert!(validate_args(&ConvertArgs::default()).is_err());
    }

    #[test]
    fn test_validate_args_missing_input() {
        let args = ConvertArgs {
            input: PathBuf::from("/nonexistent/callgrind.out"),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_blank_root() {
        let file = profile_file();
        let args = ConvertArgs {
            input: file.path().to_path_buf(),
            root: Some("  ".to_string()),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_execute_convert_writes_trace() {
        let file = profile_file();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("trace.json");

        let args = ConvertArgs {
            input: file.path().to_path_buf(),
            output_json: Some(output.clone()),
            timestamp: 1_700_000_000,
            ..Default::default()
        };
        execute_convert(args).unwrap();

        let document = crate::output::read_trace(&output).unwrap();
        assert_eq!(document.root, "main");
        let labels: Vec<&str> = document.intervals.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["main", "child", "child_body"]);
    }
}
