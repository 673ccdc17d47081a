//! `ugraph` — command-line front end for the unitgraph engine.
//!
//! Loads a conversions file, optionally generates metric-prefix edges, and
//! answers one query:
//!
//! - **`convert`** — convert a value between two units.
//! - **`path`** — show the chain of units and the composite operations.
//! - **`list`** — print every conversion in storage order.
//! - **`neighbors`** — list the units directly connected to a unit.
//! - **`check`** — validate a conversions file line by line.
//!
//! The conversions file is either JSON (an array of
//! `{"from", "to", "operations"}` objects, chosen by a `.json` extension) or
//! the line format `<from> <to> <operations>`. Pass `-` to read stdin.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use unitgraph::listing::{load_listing, write_listing};
use unitgraph::render::{render_graph, render_path, render_result};
use unitgraph::{ConversionGraph, ConversionRecord, Converter, PopulateOutcome, Quantity};

/// ugraph — convert values across a graph of user-defined unit conversions.
#[derive(Parser)]
#[command(name = "ugraph", version, about, long_about = None)]
struct Cli {
    /// Conversions file (`.json` or line format), or `-` for stdin.
    #[arg(
        short = 'f',
        long,
        env = "UGRAPH_CONVERSIONS",
        value_name = "FILE",
        global = true
    )]
    conversions: Option<PathBuf>,

    /// Generate metric-prefix conversions for an unprefixed base unit.
    /// Repeat, or separate with commas: --metric m,g
    #[arg(
        long = "metric",
        env = "UGRAPH_METRIC",
        value_name = "BASE",
        value_delimiter = ',',
        global = true
    )]
    metric: Vec<String>,

    /// Log path search and skipped conversions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert VALUE from one unit to another.
    ///
    /// Exits 1 if no chain of conversions joins the two units.
    ///
    /// Example:
    ///   ugraph -f units.txt convert 10.5 °C K
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        from: String,
        to: String,
    },

    /// Show the shortest chain of units between FROM and TO and the
    /// operations it composes to.
    Path { from: String, to: String },

    /// Print every conversion in storage order.
    List {
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },

    /// List the units with a direct conversion to UNIT.
    Neighbors { unit: String },

    /// Validate the conversions file. Exits 1 if any entry was rejected.
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum ListFormat {
    /// Aligned, human-readable table.
    Table,
    /// JSON array of `{"from", "to", "operations"}` objects.
    Json,
    /// The line format, suitable for `--conversions`.
    Listing,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (mut graph, problems) = match &cli.conversions {
        Some(path) => {
            let text = read_input(path);
            load_graph(path, &text).unwrap_or_else(|e| fatal(&e))
        }
        None => (ConversionGraph::new(), Vec::new()),
    };

    for base in &cli.metric {
        let added = graph
            .add_metric_prefix_edges(base)
            .unwrap_or_else(|e| fatal(&format!("--metric {base}: {e}")));
        tracing::info!("added {added} metric conversions for {base}");
    }

    if !matches!(cli.command, Command::Check) {
        for p in &problems {
            tracing::warn!("skipped {p}");
        }
    }

    run(&graph, &problems, cli.command);
}

fn run(graph: &ConversionGraph, problems: &[String], command: Command) {
    let converter = Converter::new(graph);

    match command {
        Command::Convert { value, from, to } => match converter.convert(value, &from, &to) {
            Some(result) => println!("{}", render_result(&Quantity::new(value, from), &result)),
            None => {
                eprintln!("no conversion from {from} to {to}");
                process::exit(1);
            }
        },

        Command::Path { from, to } => {
            let found = converter.find_path(&from, &to).and_then(|path| {
                let composite = converter.compose_path(&path)?;
                Some((path, composite))
            });
            match found {
                Some((path, composite)) => print!("{}", render_path(&path, &composite)),
                None => {
                    eprintln!("no conversion from {from} to {to}");
                    process::exit(1);
                }
            }
        }

        Command::List { format } => match format {
            ListFormat::Table => print!("{}", render_graph(graph)),
            ListFormat::Listing => print!("{}", write_listing(graph)),
            ListFormat::Json => {
                let all: Vec<_> = graph.iter().collect();
                let json = serde_json::to_string_pretty(&all)
                    .unwrap_or_else(|e| fatal(&format!("failed to encode JSON: {e}")));
                println!("{json}");
            }
        },

        Command::Neighbors { unit } => {
            let neighbors = graph.neighbors(&unit, &HashSet::new());
            if neighbors.is_empty() {
                eprintln!("no conversions involve {unit}");
                process::exit(1);
            }
            for n in neighbors {
                println!("{n}");
            }
        }

        Command::Check => {
            if problems.is_empty() {
                println!("all {} conversions valid", graph.len());
            } else {
                for p in problems {
                    eprintln!("error: {p}");
                }
                process::exit(1);
            }
        }
    }
}

/// Build a graph from a conversions file's contents.
///
/// Returns the graph plus a message for each entry that was rejected. Only a
/// JSON file that cannot be decoded at all is an error.
fn load_graph(path: &Path, text: &str) -> Result<(ConversionGraph, Vec<String>), String> {
    let mut graph = ConversionGraph::new();

    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    if !is_json {
        let problems = load_listing(&mut graph, text)
            .iter()
            .map(ToString::to_string)
            .collect();
        return Ok((graph, problems));
    }

    let records: Vec<ConversionRecord> = serde_json::from_str(text)
        .map_err(|e| format!("failed to parse {} as JSON: {e}", path.display()))?;
    let problems = records
        .iter()
        .zip(graph.populate(records.iter().cloned()))
        .enumerate()
        .filter_map(|(i, (record, outcome))| match outcome {
            PopulateOutcome::Added => None,
            PopulateOutcome::Duplicate => Some(format!(
                "record {i}: a conversion between {} and {} is already defined",
                record.from, record.to
            )),
            PopulateOutcome::Rejected(e) => Some(format!("record {i}: {e}")),
        })
        .collect();
    Ok((graph, problems))
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "unitgraph=debug,ugraph=debug"
    } else {
        "unitgraph=warn,ugraph=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &PathBuf) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            fatal(&format!("failed to read {}: {}", path.display(), e))
        })
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("ugraph: {}", msg);
    process::exit(2);
}
