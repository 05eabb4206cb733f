//! Select goroutines from a parsed dump.

use gostack_parse::{Dump, Goroutine};

/// Criteria a goroutine must meet to be kept. Unset criteria match anything.
#[derive(Debug, Clone, Default)]
pub struct GoroutineFilter {
    /// Exact scheduling state, e.g. `chan receive`.
    pub state: Option<String>,
    /// Substring of any frame's function name.
    pub function: Option<String>,
    /// Minimum time blocked, in minutes.
    pub min_wait_minutes: Option<u64>,
}

impl GoroutineFilter {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.function.is_none() && self.min_wait_minutes.is_none()
    }

    pub fn matches(&self, goroutine: &Goroutine) -> bool {
        if let Some(state) = &self.state {
            if goroutine.state != *state {
                return false;
            }
        }

        if let Some(function) = &self.function {
            if !goroutine
                .frames
                .iter()
                .any(|frame| frame.function_name.contains(function.as_str()))
            {
                return false;
            }
        }

        if let Some(min_wait) = self.min_wait_minutes {
            if goroutine.wait_minutes.unwrap_or(0) < min_wait {
                return false;
            }
        }

        true
    }

    /// Goroutines of `dump` that match, in dump order.
    pub fn apply<'a>(&'a self, dump: &'a Dump) -> impl Iterator<Item = &'a Goroutine> + 'a {
        dump.iter().filter(move |goroutine| self.matches(goroutine))
    }
}
