//! Cache hierarchy simulator CLI.
//!
//! This binary replays a memory trace through a configured cache hierarchy. It supports:
//! 1. **Classic run:** The positional `BLOCKSIZE L1_SIZE L1_ASSOC L2_SIZE L2_ASSOC PREF_N PREF_M TRACE` form.
//! 2. **Config run:** A JSON configuration describing any number of levels.
//!
//! After the trace is consumed the configuration banner, the measurements and
//! (with `--contents`) every level's final contents are printed to stdout. Set `RUST_LOG=debug` (or `trace`) for per-level and
//! per-miss logging on stderr.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use cachesim_core::cache::CacheLevel;
use cachesim_core::{CacheHierarchy, Config, SimError, TraceReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Hierarchical write-back cache simulator",
    long_about = "Replay a trace of reads and writes through a chain of set-associative caches.\n\nTrace lines are `r <hex address>` or `w <hex address>`.\n\nExamples:\n  sim run 32 8192 4 262144 8 0 0 traces/gcc_trace.txt\n  sim run 16 1024 1 0 0 0 0 traces/short.txt --contents\n  sim config three_level.json traces/gcc_trace.txt --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run with one or two levels given positionally (L2_SIZE 0 means no L2).
    Run {
        /// Block size in bytes (power of two).
        block_size: u32,
        /// L1 size in bytes.
        l1_size: u32,
        /// L1 associativity.
        l1_assoc: u32,
        /// L2 size in bytes (0 disables L2).
        l2_size: u32,
        /// L2 associativity.
        l2_assoc: u32,
        /// Number of stream buffers (0 disables prefetching).
        pref_n: u32,
        /// Blocks per stream buffer.
        pref_m: u32,
        /// Trace file.
        trace: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run with a JSON configuration file.
    Config {
        /// JSON configuration file.
        config: PathBuf,
        /// Trace file.
        trace: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Print the measurements as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Also print the final contents of every level.
    #[arg(long)]
    contents: bool,
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            block_size,
            l1_size,
            l1_assoc,
            l2_size,
            l2_assoc,
            pref_n,
            pref_m,
            trace,
            output,
        } => {
            let config = Config::from_params(
                block_size, l1_size, l1_assoc, l2_size, l2_assoc, pref_n, pref_m,
            );
            simulate(&config, &trace, &output)
        }
        Commands::Config {
            config,
            trace,
            output,
        } => Config::from_file(&config)
            .map_err(SimError::from)
            .and_then(|config| simulate(&config, &trace, &output)),
    };

    match result {
        Ok(report) => print!("{report}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Builds the hierarchy, replays the trace, and renders the report.
fn simulate(config: &Config, trace: &Path, output: &OutputArgs) -> Result<String, SimError> {
    let mut hierarchy = CacheHierarchy::new(config)?;
    info!(trace = %trace.display(), levels = hierarchy.depth(), "replaying trace");

    let records = hierarchy.replay(TraceReader::open(trace)?)?;
    info!(records, "replay finished");

    render(&hierarchy, config, trace, output)
}

/// Banner, then measurements (text or JSON), then the optional contents dump.
fn render(
    hierarchy: &CacheHierarchy,
    config: &Config,
    trace: &Path,
    output: &OutputArgs,
) -> Result<String, SimError> {
    let mut out = config.to_string();
    out.push_str(&format!("{:<12}{}\n", "trace_file:", trace.display()));

    let stats = hierarchy.stats();
    if output.json {
        out.push_str(&stats.to_json().map_err(SimError::Report)?);
        out.push('\n');
    } else {
        out.push_str(&stats.to_string());
    }

    if output.contents {
        for level in hierarchy.levels() {
            out.push_str(&contents(level));
        }
    }
    Ok(out)
}

/// Every set of `level`, most recently used block first, `D` marking dirty blocks.
fn contents(level: &CacheLevel) -> String {
    let mut out = format!("===== {} contents =====\n", level.name());
    for (set, lines) in level.contents().iter().enumerate() {
        let blocks: Vec<String> = lines
            .iter()
            .map(|line| {
                if line.dirty {
                    format!("{:x} D", line.tag)
                } else {
                    format!("{:x}", line.tag)
                }
            })
            .collect();
        out.push_str(&format!("set {set:>6}: {}\n", blocks.join("  ")));
    }
    out
}
