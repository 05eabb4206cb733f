//! Tools for working with goroutine dumps.
//!
//! Parsing lives in [`gostack_parse`]; this crate adds what the `gostack`
//! binary needs on top of it.
//!
//! - [`filter`] - Select goroutines by state, function or wait time
//! - [`output`] - Write goroutines as NDJSON records or dump text
//!
//! # Example
//!
//! ```no_run
//! use gostack::filter::GoroutineFilter;
//! use gostack::output::{OutputFormat, write_output};
//! use gostack_parse::DumpParser;
//! use std::fs::File;
//!
//! let parsed = DumpParser::new().parse(File::open("crash.txt").unwrap()).unwrap();
//! let filter = GoroutineFilter {
//!     state: Some("chan receive".to_string()),
//!     ..Default::default()
//! };
//!
//! let selected = filter.apply(&parsed.dump);
//! write_output(std::io::stdout(), OutputFormat::Json, selected, &parsed.warnings).unwrap();
//! ```

pub mod filter;
pub mod output;

// Re-export gostack_parse for convenience
pub use gostack_parse;
