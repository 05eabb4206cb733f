//! Non-fatal diagnostics collected while parsing.
//!
//! Every parsing operation in this crate reports problems by returning a
//! [`Warnings`] log instead of failing. Logs are concatenated in the order
//! the offending lines were read, so a warning's position lines up with its
//! source line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recoverable parse anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// 1-based line number in the dump, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Append-only, ordered log of warnings for one parse session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Warnings(Vec<Warning>);

impl Warnings {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(Warning::new(message));
    }

    /// Append another log, keeping its order.
    pub fn extend(&mut self, other: Warnings) {
        self.0.extend(other.0);
    }

    /// Stamp every warning that has no line number yet with `line`.
    pub fn at_line(mut self, line: usize) -> Self {
        for warning in &mut self.0 {
            warning.line.get_or_insert(line);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Warning] {
        &self.0
    }
}

impl IntoIterator for Warnings {
    type Item = Warning;
    type IntoIter = std::vec::IntoIter<Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::AddAssign for Warnings {
    fn add_assign(&mut self, other: Warnings) {
        self.extend(other);
    }
}
