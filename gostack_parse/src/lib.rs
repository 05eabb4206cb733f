//! Goroutine dump parser library.
//!
//! This library decodes the stack dump a Go program prints when it panics or
//! receives `SIGQUIT` into structured [`Goroutine`] records. Malformed input
//! never stops the parse; it is reported through an ordered [`Warnings`] log
//! instead.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use gostack_parse::DumpParser;
//!
//! let file = File::open("crash.txt").unwrap();
//! let parsed = DumpParser::new().parse(file).unwrap();
//!
//! println!("Goroutines: {}", parsed.dump.len());
//! for warning in &parsed.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! ```

pub mod dump;
pub mod frame;
pub mod goroutine;
pub mod warning;

pub use dump::{Dump, DumpParser, ParsedDump, ParserConfig};
pub use frame::StackFrame;
pub use goroutine::Goroutine;
pub use warning::{Warning, Warnings};

use thiserror::Error;

/// Errors that stop a parse. Malformed input is never one of them.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dump parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
