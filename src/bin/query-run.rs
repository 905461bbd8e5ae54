//! CLI tool to run the demo query pipelines.
//!
//! Usage:
//!   query-run reverse "Hello, World!"
//!   query-run squares --from 1 --to 11 -o squares.txt
//!   query-run letters banana kiwi
//!
//! If no output file is specified, writes to stdout.

use clap::{Parser, Subcommand};
use lazy_query::{
    Stage, filter, from_range, from_range_infinite, lift, order_by, order_by_descending, select,
    select_many, zip_with,
};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;

/// Run a demo query pipeline and print one element per line.
#[derive(Parser)]
#[command(name = "query-run")]
struct Cli {
    #[command(subcommand)]
    demo: Demo,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Show the demo name and element count on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Demo {
    /// Reverse text by zipping it with an unbounded counter and sorting descending
    Reverse {
        /// Text to reverse
        text: String,
    },
    /// Square the even numbers of the range [from, to)
    Squares {
        #[arg(long, default_value_t = 1)]
        from: i64,
        #[arg(long, default_value_t = 11)]
        to: i64,
    },
    /// Split words into letters and sort them
    Letters {
        /// Words to split
        #[arg(required = true)]
        words: Vec<String>,
    },
}

impl Demo {
    fn name(&self) -> &'static str {
        match self {
            Demo::Reverse { .. } => "reverse",
            Demo::Squares { .. } => "squares",
            Demo::Letters { .. } => "letters",
        }
    }

    fn run(&self) -> Vec<String> {
        match self {
            Demo::Reverse { text } => {
                let query = lift(text.chars())
                    >> zip_with(from_range_infinite(0))
                    >> order_by_descending(|a: &(char, i64), b: &(char, i64)| a.1 < b.1)
                    >> select(|(c, _): (char, i64)| c);
                vec![query.iter().collect()]
            }
            Demo::Squares { from, to } => {
                let query = from_range(*from, *to)
                    >> filter(|x: &i64| x % 2 == 0)
                    >> select(|x: i64| x * x);
                query.iter().map(|x| x.to_string()).collect()
            }
            Demo::Letters { words } => {
                let query = lift(words)
                    >> select_many(|word: &String| word.chars().collect::<Vec<_>>())
                    >> order_by(|a: &char, b: &char| a < b);
                query.iter().map(String::from).collect()
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("Demo:   {}", cli.demo.name());
        eprintln!("Output: {}", cli.output.as_deref().unwrap_or("(stdout)"));
    }

    let lines = cli.demo.run();
    let output = lines.join("\n");

    if let Some(out_path) = &cli.output {
        if let Some(parent) = Path::new(out_path.as_str()).parent()
            && !parent.as_os_str().is_empty()
            && fs::create_dir_all(parent).is_err()
        {
            eprintln!("Error creating output directory for '{out_path}'");
            process::exit(1);
        }
        if let Err(e) = fs::write(out_path, &output) {
            eprintln!("Error writing output file '{out_path}': {e}");
            process::exit(1);
        }
    } else {
        if let Err(e) = io::stdout().write_all(output.as_bytes()) {
            eprintln!("Error writing output: {e}");
            process::exit(1);
        }
        if !output.is_empty() && !output.ends_with('\n') {
            println!();
        }
    }

    if cli.verbose {
        eprintln!("Elements: {}", lines.len());
    }
}
