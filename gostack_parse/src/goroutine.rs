//! Goroutine records: a header line plus the frames that follow it.

use crate::frame::{StackFrame, looks_like_function_line};
use crate::warning::Warnings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const HEADER_KEYWORD: &str = "goroutine";

/// Printed by the runtime when a stack is too deep to dump in full.
pub const ELIDED_MARKER: &str = "...additional frames elided...";

/// Printed instead of frames for a goroutine running on another thread.
pub const UNAVAILABLE_MARKER: &str = "goroutine running on other thread; stack unavailable";

/// One goroutine from a dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goroutine {
    /// Goroutine id; 0 when the header could not be parsed.
    pub id: u64,
    /// Scheduling state, e.g. `running`, `chan receive`, `sync.Mutex.Lock`.
    pub state: String,
    /// How long the goroutine has been blocked, in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_minutes: Option<u64>,
    #[serde(default)]
    pub locked_to_thread: bool,
    #[serde(default)]
    pub frames_elided: bool,
    #[serde(default)]
    pub stack_unavailable: bool,
    pub frames: Vec<StackFrame>,
}

impl Goroutine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `line` starts a new goroutine.
    ///
    /// A header is `goroutine` followed by either a numeric id or a bracketed
    /// state. This keeps `goroutine running on other thread; ...` out while
    /// still catching headers with a malformed id.
    pub fn is_header(line: &str) -> bool {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(HEADER_KEYWORD) {
            return false;
        }
        match tokens.next() {
            Some(id) => id.bytes().all(|b| b.is_ascii_digit()) || line.contains('['),
            None => false,
        }
    }

    /// Whether `line` could be a header once a goroutine is already open.
    ///
    /// Inside a goroutine any `goroutine <token>` line that is neither a
    /// function line nor the stack-unavailable marker closes it, so a header
    /// like `goroutine abc` still starts a new record.
    pub fn is_header_in_goroutine(line: &str) -> bool {
        let trimmed = line.trim();
        if Self::is_header(trimmed) {
            return true;
        }
        let mut tokens = trimmed.split_whitespace();
        tokens.next() == Some(HEADER_KEYWORD)
            && tokens.next().is_some()
            && trimmed != UNAVAILABLE_MARKER
            && !looks_like_function_line(trimmed)
    }

    /// Parse a header line such as `goroutine 7 [chan receive, 3 minutes]:`.
    ///
    /// Malformed headers produce warnings and fall back to id 0 and, when no
    /// bracketed state can be found, the raw remainder of the line as state.
    pub fn parse_line(&mut self, line: &str) -> Warnings {
        self.parse_header(line).0
    }

    /// Like [`Goroutine::parse_line`], also reporting whether the id was
    /// read from the header (as opposed to the fallback id 0).
    pub fn parse_header(&mut self, line: &str) -> (Warnings, bool) {
        let mut warnings = Warnings::new();
        let trimmed = line.trim();
        let header = trimmed.strip_suffix(':').unwrap_or(trimmed).trim_end();

        let rest = match header.strip_prefix(HEADER_KEYWORD) {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
            _ => {
                warnings.push(format!("not a goroutine header: {trimmed:?}"));
                self.id = 0;
                self.state = trimmed.to_string();
                return (warnings, false);
            }
        };

        let Some(open) = rest.find('[') else {
            warnings.push(format!("goroutine header has no [state]: {trimmed:?}"));
            let mut tokens = rest.splitn(2, char::is_whitespace);
            let id_token = tokens.next().unwrap_or("");
            let id_parsed = match id_token.parse() {
                Ok(id) => {
                    self.id = id;
                    self.state = tokens.next().unwrap_or("").trim().to_string();
                    true
                }
                Err(_) => {
                    self.id = 0;
                    self.state = rest.to_string();
                    false
                }
            };
            return (warnings, id_parsed);
        };

        let mut prefix_tokens = rest[..open].split_whitespace();
        let parsed_id = match prefix_tokens.next() {
            None => {
                warnings.push(format!("goroutine header has no id: {trimmed:?}"));
                None
            }
            Some(token) => match token.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    warnings.push(format!(
                        "invalid goroutine id {token:?} in header {trimmed:?}"
                    ));
                    None
                }
            },
        };
        self.id = parsed_id.unwrap_or(0);
        for token in prefix_tokens {
            // gp=/m=/mp= annotations from newer runtimes
            if !token.contains('=') {
                warnings.push(format!("unexpected token {token:?} in goroutine header"));
            }
        }

        let (inside, trailing) = match rest[open..].find(']') {
            Some(close) => (&rest[open + 1..open + close], rest[open + close + 1..].trim()),
            None => {
                warnings.push(format!("unterminated [state] in goroutine header: {trimmed:?}"));
                (&rest[open + 1..], "")
            }
        };
        if !trailing.is_empty() {
            warnings.push(format!("unexpected text {trailing:?} after goroutine state"));
        }

        let mut components = inside.split(',').map(str::trim);
        self.state = components.next().unwrap_or("").to_string();
        if self.state.is_empty() {
            warnings.push(format!("goroutine header has an empty state: {trimmed:?}"));
        }

        self.wait_minutes = None;
        self.locked_to_thread = false;
        for component in components {
            if component == "locked to thread" {
                self.locked_to_thread = true;
            } else if let Some(minutes) = parse_minutes(component) {
                self.wait_minutes = Some(minutes);
            } else {
                warnings.push(format!(
                    "unexpected component {component:?} in goroutine state"
                ));
            }
        }

        (warnings, parsed_id.is_some())
    }

    /// Append a frame; frames keep the order they appear in the dump.
    pub fn add_frame(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    pub fn mark_elided(&mut self) {
        self.frames_elided = true;
    }

    pub fn mark_stack_unavailable(&mut self) {
        self.stack_unavailable = true;
    }

    /// The wait as a [`Duration`], saturating for absurd minute counts.
    pub fn wait_duration(&self) -> Option<Duration> {
        self.wait_minutes
            .map(|m| Duration::from_secs(m.saturating_mul(60)))
    }

    /// The innermost frame, i.e. where the goroutine is currently parked.
    pub fn top_frame(&self) -> Option<&StackFrame> {
        self.frames.first()
    }
}

impl fmt::Display for Goroutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}", HEADER_KEYWORD, self.id, self.state)?;
        if let Some(minutes) = self.wait_minutes {
            write!(f, ", {} minutes", minutes)?;
        }
        if self.locked_to_thread {
            write!(f, ", locked to thread")?;
        }
        write!(f, "]:")?;

        if self.stack_unavailable {
            write!(f, "\n\t{}", UNAVAILABLE_MARKER)?;
        }

        // The runtime prints the elision marker just before `created by`
        let creator_idx = self
            .frames
            .iter()
            .position(|frame| frame.created_by)
            .unwrap_or(self.frames.len());
        for (idx, frame) in self.frames.iter().enumerate() {
            if self.frames_elided && idx == creator_idx {
                write!(f, "\n{}", ELIDED_MARKER)?;
            }
            write!(f, "\n{}", frame)?;
        }
        if self.frames_elided && creator_idx == self.frames.len() {
            write!(f, "\n{}", ELIDED_MARKER)?;
        }
        Ok(())
    }
}

/// Parse `N minutes` (or `1 minute`).
fn parse_minutes(component: &str) -> Option<u64> {
    let (count, unit) = component.split_once(char::is_whitespace)?;
    match unit.trim() {
        "minutes" | "minute" => count.parse().ok(),
        _ => None,
    }
}
