//! Decode a goroutine dump into structured records.
//!
//! This binary reads the stack dump a Go program prints on panic or
//! `SIGQUIT`, parses it, and writes the goroutines as NDJSON records or as
//! normalized dump text. Parse warnings are logged to stderr and, in JSON
//! mode, appended to the output as `warning` records.
//!
//! # Usage
//!
//! ```bash
//! gostack crash.txt -o goroutines.ndjson
//! gostack crash.txt --state "chan receive" --min-wait 10
//! kill -QUIT $PID 2> dump.txt; gostack dump.txt -f text --function mypkg.
//! ```

use clap::{Parser, ValueEnum};
use env_logger::Env;
use gostack::filter::GoroutineFilter;
use gostack::output::{OutputFormat, write_output};
use gostack_parse::{DumpParser, ParserConfig};
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// One JSON record per goroutine, then one per warning
    Json,
    /// Goroutine dump text
    Text,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Json => OutputFormat::Json,
            Format::Text => OutputFormat::Text,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gostack")]
#[command(about = "Decode goroutine dumps into structured records")]
#[command(version)]
struct Args {
    /// Input dump file (reads stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Only keep goroutines in this state
    #[arg(long)]
    state: Option<String>,

    /// Only keep goroutines with a frame whose function contains this text
    #[arg(long)]
    function: Option<String>,

    /// Only keep goroutines blocked for at least this many minutes
    #[arg(long, value_name = "MINUTES")]
    min_wait: Option<u64>,

    /// Do not warn about lines outside goroutines (panic message, exit status)
    #[arg(long)]
    quiet_preamble: bool,

    /// Always read the line after a function line as its file line
    #[arg(long)]
    strict_pairs: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn open_input(input: Option<&PathBuf>) -> Result<Box<dyn Read>, Box<dyn std::error::Error>> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path).map_err(|e| {
                format!("Failed to open input file '{}': {}", path.display(), e)
            })?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = ParserConfig {
        warn_on_unrecognized: !args.quiet_preamble,
        recover_missing_file_lines: !args.strict_pairs,
    };

    let reader = open_input(args.input.as_ref())?;
    let parsed = DumpParser::with_config(config).parse(reader)?;

    for warning in &parsed.warnings {
        warn!("{}", warning);
    }

    let filter = GoroutineFilter {
        state: args.state,
        function: args.function,
        min_wait_minutes: args.min_wait,
    };
    let selected: Vec<_> = filter.apply(&parsed.dump).collect();

    info!(
        "Parsed {} goroutines ({} frames), {} selected, {} warnings",
        parsed.dump.len(),
        parsed.dump.frame_count(),
        selected.len(),
        parsed.warnings.len()
    );

    match &args.output {
        Some(path) => {
            let output_file = File::create(path).map_err(|e| {
                format!("Failed to create output file '{}': {}", path.display(), e)
            })?;
            let mut writer = BufWriter::new(output_file);
            write_output(&mut writer, args.format.into(), selected, &parsed.warnings)?;
            writer.flush()?;
            info!("Wrote '{}'", path.display());
        }
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            write_output(&mut writer, args.format.into(), selected, &parsed.warnings)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
