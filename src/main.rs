//! callgrind-spans CLI
//!
//! Reads a callgrind-format build profile and writes the laid-out
//! interval tree as a JSON trace document.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use callgrind_spans::callgraph::FunctionIdentity;
use callgrind_spans::commands::{execute_convert, list_roots, validate_args, ConvertArgs};
use callgrind_spans::layout::{LayoutConfig, RootDuration};
use callgrind_spans::parser::ParserConfig;
use callgrind_spans::utils::config::SCHEMA_VERSION;

/// callgrind-spans - turn build profiles into trace spans
#[derive(Parser, Debug)]
#[command(name = "callgrind-spans")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Where the root interval gets its duration
#[derive(ValueEnum, Clone, Copy, Debug)]
enum RootDurationArg {
    /// Root function's self cost, the profile total when that is zero
    #[value(name = "self")]
    SelfCost,
    /// Profile total from the summary line
    #[value(name = "total")]
    TotalCost,
}

impl From<RootDurationArg> for RootDuration {
    fn from(arg: RootDurationArg) -> Self {
        match arg {
            RootDurationArg::SelfCost => RootDuration::SelfCost,
            RootDurationArg::TotalCost => RootDuration::TotalCost,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a profile into a JSON interval trace
    Convert {
        /// Path to the callgrind profile
        input: PathBuf,

        /// Output path for the JSON trace (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Unix timestamp (seconds) the build started at; defaults to now
        #[arg(long, env = "CALLGRIND_SPANS_TIMESTAMP")]
        timestamp: Option<i64>,

        /// Function to start the layout from (defaults to the heaviest root)
        #[arg(long)]
        root: Option<String>,

        /// Source of the root interval's duration
        #[arg(long, value_enum, default_value = "total")]
        root_duration: RootDurationArg,

        /// Do not emit self-time intervals for functions that call nothing
        #[arg(long)]
        no_leaf_body: bool,

        /// Tell same-named functions apart by object and file
        #[arg(long)]
        qualified: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// List the root functions of a profile
    Roots {
        /// Path to the callgrind profile
        input: PathBuf,

        /// Tell same-named functions apart by object and file
        #[arg(long)]
        qualified: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            timestamp,
            root,
            root_duration,
            no_leaf_body,
            qualified,
            summary,
        } => {
            let mut args = ConvertArgs {
                input,
                output_json: output,
                root,
                parser_config: parser_config(qualified),
                layout_config: LayoutConfig::new()
                    .with_root_duration(root_duration.into())
                    .with_leaf_self_time(!no_leaf_body),
                print_summary: summary,
                ..Default::default()
            };
            if let Some(timestamp) = timestamp {
                args.timestamp = timestamp;
            }

            // Validate args first
            validate_args(&args)?;

            execute_convert(args)?;
        }

        Commands::Roots { input, qualified } => {
            list_roots(&input, &parser_config(qualified))?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

fn parser_config(qualified: bool) -> ParserConfig {
    let identity = if qualified {
        FunctionIdentity::Qualified
    } else {
        FunctionIdentity::Name
    };
    ParserConfig::new().with_identity(identity)
}

fn display_version() {
    println!("callgrind-spans v{}", env!("CARGO_PKG_VERSION"));
    println!("Trace Schema: v{}", SCHEMA_VERSION);
}
