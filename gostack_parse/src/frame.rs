//! Stack frames: one function line plus one file line.
//!
//! A goroutine dump prints each call site as a pair of lines:
//!
//! ```text
//! main.(*Server).handle(0xc000010000, {0x4b6f20, 0x5})
//! 	/home/user/app/server.go:42 +0x1d
//! ```
//!
//! The first line names the function and its raw argument words, the second
//! gives the source location and the program counter offset within the
//! function. The bottom of a goroutine's stack usually carries a
//! `created by <function>` pair, parsed the same way.

use crate::warning::Warnings;
use serde::{Deserialize, Serialize};
use std::fmt;

const CREATED_BY_PREFIX: &str = "created by ";

/// A single call site in a goroutine's stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Fully qualified function name, e.g. `net/http.(*conn).serve`.
    pub function_name: String,
    /// Import path of the package, derived from `function_name`.
    pub package_path: String,
    /// Raw argument words between the parentheses, if any were printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    pub file_name: String,
    pub line_number: u32,
    /// The `+0x..` offset printed after the line number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc_offset: Option<u64>,
    /// True for the `created by` pair that closes a goroutine's stack.
    #[serde(default)]
    pub created_by: bool,
}

impl StackFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from its two source lines.
    pub fn from_lines(function_line: &str, file_line: &str) -> (Self, Warnings) {
        let mut frame = Self::new();
        let mut warnings = frame.parse_function_line(function_line);
        warnings += frame.parse_file_line(file_line);
        (frame, warnings)
    }

    /// Parse a function line into this frame.
    ///
    /// Accepts `pkg.Function(args)` and `created by pkg.Function`, the latter
    /// optionally followed by ` in goroutine N`. When the line does not have
    /// that shape the function fields keep their defaults and a warning is
    /// returned.
    pub fn parse_function_line(&mut self, line: &str) -> Warnings {
        let mut warnings = Warnings::new();
        let trimmed = line.trim();

        if trimmed.is_empty() {
            warnings.push("empty function line");
            return warnings;
        }

        if let Some(rest) = trimmed.strip_prefix(CREATED_BY_PREFIX) {
            // Go 1.21+ appends the parent goroutine id
            let name = match rest.find(" in goroutine ") {
                Some(pos) => &rest[..pos],
                None => rest,
            }
            .trim();

            if name.is_empty() || name.contains(char::is_whitespace) {
                warnings.push(format!("malformed 'created by' line: {trimmed:?}"));
                return warnings;
            }

            self.function_name = name.to_string();
            self.package_path = package_path_of(name);
            self.arguments = None;
            self.created_by = true;
            return warnings;
        }

        let Some((name, args, trailing)) = split_call_with_trailing(trimmed) else {
            warnings.push(format!("function line has no argument list: {trimmed:?}"));
            return warnings;
        };

        if name.is_empty() || name.contains(char::is_whitespace) {
            warnings.push(format!("malformed function name in line: {trimmed:?}"));
            return warnings;
        }

        self.function_name = name.to_string();
        self.package_path = package_path_of(name);
        self.arguments = if args.trim().is_empty() {
            None
        } else {
            Some(args.to_string())
        };
        self.created_by = false;

        if !trailing.is_empty() {
            warnings.push(format!("ignoring {trailing:?} after the argument list"));
        }
        warnings
    }

    /// Parse a file line into this frame.
    ///
    /// Expected shape: `<path>:<line> [+0x<offset>]`. The `fp=`, `sp=` and
    /// `pc=` annotations printed with `GOTRACEBACK=system` are skipped. The
    /// file name and line number are only set together; a line without a
    /// usable line number leaves both at their defaults.
    pub fn parse_file_line(&mut self, line: &str) -> Warnings {
        let mut warnings = Warnings::new();
        let trimmed = line.trim();

        if trimmed.is_empty() {
            warnings.push("empty file line");
            return warnings;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let Some(loc_idx) = tokens.iter().position(|t| split_location(t).is_some()) else {
            if trimmed.contains(':') {
                warnings.push(format!("invalid line number in file line: {trimmed:?}"));
            } else {
                warnings.push(format!("file line has no line number: {trimmed:?}"));
            }
            return warnings;
        };

        // Paths may contain spaces; rejoin everything up to the location token
        let location = tokens[..=loc_idx].join(" ");
        let Some((file, line_number)) = split_location(&location) else {
            warnings.push(format!("invalid line number in file line: {trimmed:?}"));
            return warnings;
        };

        if file.is_empty() {
            warnings.push(format!("file line has no file name: {trimmed:?}"));
            return warnings;
        }

        self.file_name = file.to_string();
        self.line_number = line_number;

        for token in &tokens[loc_idx + 1..] {
            if let Some(hex) = token.strip_prefix("+0x") {
                match u64::from_str_radix(hex, 16) {
                    Ok(offset) => self.pc_offset = Some(offset),
                    Err(_) => warnings.push(format!("invalid pc offset {token:?}")),
                }
            } else if token.contains('=') {
                // fp=/sp=/pc= annotations
                continue;
            } else {
                warnings.push(format!("unexpected token {token:?} in file line"));
            }
        }

        warnings
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.created_by {
            writeln!(f, "{}{}", CREATED_BY_PREFIX, self.function_name)?;
        } else {
            writeln!(
                f,
                "{}({})",
                self.function_name,
                self.arguments.as_deref().unwrap_or("")
            )?;
        }
        write!(f, "\t{}:{}", self.file_name, self.line_number)?;
        if let Some(offset) = self.pc_offset {
            write!(f, " +0x{:x}", offset)?;
        }
        Ok(())
    }
}

/// Derive the package import path from a qualified function name.
///
/// `github.com/acme/app/store.(*DB).Get` gives `github.com/acme/app/store`,
/// `main.main.func1` gives `main`. Names without a package qualifier (such
/// as `panic`) give an empty string.
pub fn package_path_of(function_name: &str) -> String {
    let tail_start = function_name.rfind('/').map_or(0, |i| i + 1);
    match function_name[tail_start..].find('.') {
        Some(dot) => function_name[..tail_start + dot].to_string(),
        None => String::new(),
    }
}

/// Whether a line has the `<path>:<line>` shape of a file line.
pub fn looks_like_file_line(line: &str) -> bool {
    line.split_whitespace()
        .any(|token| split_location(token).is_some())
}

/// Whether a line has the shape of a function line (and not a file line).
pub fn looks_like_function_line(line: &str) -> bool {
    let trimmed = line.trim();
    if looks_like_file_line(trimmed) {
        return false;
    }
    trimmed.starts_with(CREATED_BY_PREFIX) || split_call(trimmed).is_some()
}

/// Like [`split_call`], but allows whitespace-separated text after the
/// argument list, returned as the third element.
fn split_call_with_trailing(line: &str) -> Option<(&str, &str, &str)> {
    let whole = split_call(line);
    if let Some((name, args)) = whole {
        if !name.contains(char::is_whitespace) {
            return Some((name, args, ""));
        }
    }

    for (idx, ch) in line.char_indices() {
        if ch != ')' || !line[idx + 1..].starts_with(char::is_whitespace) {
            continue;
        }
        if let Some((name, args)) = split_call(&line[..=idx]) {
            if !name.contains(char::is_whitespace) {
                return Some((name, args, line[idx + 1..].trim()));
            }
        }
    }
    whole.map(|(name, args)| (name, args, ""))
}

/// Split `name(args)` at the argument list that closes the line.
///
/// Method receivers such as `(*T)` are part of the name, so the matching
/// open parenthesis is found by scanning back from the end.
fn split_call(line: &str) -> Option<(&str, &str)> {
    if !line.ends_with(')') {
        return None;
    }

    let mut depth = 0usize;
    for (idx, ch) in line.char_indices().rev() {
        match ch {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some((&line[..idx], &line[idx + 1..line.len() - 1]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `path:123` into the path and line number.
fn split_location(token: &str) -> Option<(&str, u32)> {
    let colon = token.rfind(':')?;
    let digits = &token[colon + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let line_number = digits.parse().ok()?;
    Some((&token[..colon], line_number))
}
