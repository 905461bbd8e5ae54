//! CLI tool to run the text-reversal query with every stage traced.

use clap::Parser;
use lazy_query::{
    Stage, from_range_infinite, lift, order_by_descending, select, trace_with, zip_with,
};
use query_trace::TraceRecorder;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;

/// Reverse text through a zip/sort/select query and print the stage trace.
///
/// The result goes to stdout; the trace goes to stderr, or to a file with
/// `--trace-file`.
#[derive(Parser)]
#[command(name = "query-trace-run")]
struct Cli {
    /// Text to reverse
    text: String,

    /// Write the trace to a file instead of stderr
    #[arg(short, long)]
    trace_file: Option<String>,

    /// Print the number of recorded events on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let recorder = TraceRecorder::new();

    let query = lift(cli.text.chars())
        >> trace_with("lift", recorder.clone())
        >> zip_with(from_range_infinite(0) >> trace_with("range", recorder.clone()))
        >> trace_with("zip_with", recorder.clone())
        >> order_by_descending(|a: &(char, i64), b: &(char, i64)| a.1 < b.1)
        >> trace_with("order_by", recorder.clone())
        >> select(|(c, _): (char, i64)| c)
        >> trace_with("select", recorder.clone());

    let reversed: String = query.iter().collect();
    println!("{reversed}");

    let trace = recorder.render();
    if let Some(path) = &cli.trace_file {
        if let Some(parent) = Path::new(path.as_str()).parent()
            && !parent.as_os_str().is_empty()
            && fs::create_dir_all(parent).is_err()
        {
            eprintln!("Error creating trace directory for '{path}'");
            process::exit(1);
        }
        if let Err(e) = fs::write(path, &trace) {
            eprintln!("Error writing trace file '{path}': {e}");
            process::exit(1);
        }
    } else if let Err(e) = writeln!(io::stderr(), "{trace}") {
        eprintln!("Error writing trace: {e}");
        process::exit(1);
    }

    if cli.verbose {
        eprintln!("Events: {}", recorder.len());
    }
}
