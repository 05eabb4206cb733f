//! Line-oriented parser for complete goroutine dumps.
//!
//! [`DumpParser`] is a small state machine fed one line at a time. A header
//! line opens a goroutine, each following function/file line pair becomes a
//! [`StackFrame`], and a blank line, another header or the end of input
//! closes the goroutine. Nothing in the input aborts the parse: every
//! anomaly is recorded in the [`Warnings`] log and the parser carries on
//! with the next line.
//!
//! # Example
//!
//! ```
//! use gostack_parse::DumpParser;
//!
//! let parsed = DumpParser::new().parse_lines([
//!     "goroutine 1 [running]:",
//!     "main.main()",
//!     "\t/src/main.go:10 +0x20",
//! ]);
//!
//! assert_eq!(parsed.dump.len(), 1);
//! assert!(parsed.warnings.is_empty());
//! ```

use crate::Result;
use crate::frame::{StackFrame, looks_like_file_line, looks_like_function_line};
use crate::goroutine::{ELIDED_MARKER, Goroutine, UNAVAILABLE_MARKER};
use crate::warning::Warnings;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::io::{self, BufRead, BufReader, Read, Write};

/// Configuration for the dump parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Warn about non-blank lines outside any goroutine, such as the
    /// `panic:` preamble or a trailing `exit status 2`.
    pub warn_on_unrecognized: bool,
    /// When a function line is followed by another function line, drop the
    /// first one and start a new frame instead of reading the second as a
    /// file line.
    pub recover_missing_file_lines: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            warn_on_unrecognized: true,
            recover_missing_file_lines: true,
        }
    }
}

/// All goroutines of one dump, in the order they were printed.
///
/// Ids are expected to be unique, but duplicates are kept (and reported as
/// warnings) so that every header in the input yields one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dump {
    goroutines: Vec<Goroutine>,
}

impl Dump {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, goroutine: Goroutine) {
        self.goroutines.push(goroutine);
    }

    /// The first goroutine with the given id.
    pub fn get(&self, id: u64) -> Option<&Goroutine> {
        self.goroutines.iter().find(|g| g.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.goroutines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goroutines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Goroutine> {
        self.goroutines.iter()
    }

    pub fn goroutines(&self) -> &[Goroutine] {
        &self.goroutines
    }

    pub fn into_goroutines(self) -> Vec<Goroutine> {
        self.goroutines
    }

    /// Total number of frames across all goroutines.
    pub fn frame_count(&self) -> usize {
        self.goroutines.iter().map(|g| g.frames.len()).sum()
    }

    /// Write the dump back out in the runtime's text format.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (idx, goroutine) in self.goroutines.iter().enumerate() {
            if idx > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "{}", goroutine)?;
        }
        Ok(())
    }
}

impl FromIterator<Goroutine> for Dump {
    fn from_iter<I: IntoIterator<Item = Goroutine>>(iter: I) -> Self {
        Self {
            goroutines: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dump {
    type Item = &'a Goroutine;
    type IntoIter = std::slice::Iter<'a, Goroutine>;

    fn into_iter(self) -> Self::IntoIter {
        self.goroutines.iter()
    }
}

/// Result of a parse session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDump {
    pub dump: Dump,
    pub warnings: Warnings,
}

/// Where the parser is between lines.
#[derive(Debug)]
enum ParseState {
    AwaitingHeader,
    /// A goroutine is open and the next line should be a function line.
    InGoroutine(Goroutine),
    /// A function line was read; the frame completes with the next line.
    AwaitingFileLine(Goroutine, StackFrame),
}

/// Streaming parser for goroutine dumps.
///
/// Each parser owns its state, so separate dumps can be parsed on separate
/// threads with separate parsers.
#[derive(Debug)]
pub struct DumpParser {
    config: ParserConfig,
    state: ParseState,
    dump: Dump,
    warnings: Warnings,
    seen_ids: HashSet<u64>,
    line_number: usize,
}

impl DumpParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            state: ParseState::AwaitingHeader,
            dump: Dump::new(),
            warnings: Warnings::new(),
            seen_ids: HashSet::new(),
            line_number: 0,
        }
    }

    /// Parse a dump from a reader.
    ///
    /// Only I/O failures are errors. Bytes that are not valid UTF-8 are
    /// replaced and reported as a warning.
    pub fn parse<R: Read>(mut self, reader: R) -> Result<ParsedDump> {
        let mut buf_reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if buf_reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }

            let line = String::from_utf8_lossy(&buf);
            let lossy = matches!(line, Cow::Owned(_));
            self.feed(&line, lossy);
        }

        Ok(self.finish())
    }

    /// Parse an already split sequence of lines.
    pub fn parse_lines<I, S>(mut self, lines: I) -> ParsedDump
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.feed_line(line.as_ref());
        }
        self.finish()
    }

    /// Feed the next line of the dump, without its line terminator.
    pub fn feed_line(&mut self, line: &str) {
        self.feed(line, false);
    }

    /// Close any open goroutine and return the result.
    pub fn finish(mut self) -> ParsedDump {
        match std::mem::replace(&mut self.state, ParseState::AwaitingHeader) {
            ParseState::AwaitingHeader => {}
            ParseState::InGoroutine(goroutine) => self.finalize(goroutine),
            ParseState::AwaitingFileLine(goroutine, frame) => {
                self.warn(format!(
                    "input ended before the file line for {:?}",
                    frame.function_name
                ));
                self.finalize(goroutine);
            }
        }

        debug!(
            "parsed {} goroutines ({} frames) from {} lines with {} warnings",
            self.dump.len(),
            self.dump.frame_count(),
            self.line_number,
            self.warnings.len()
        );

        ParsedDump {
            dump: self.dump,
            warnings: self.warnings,
        }
    }

    fn feed(&mut self, line: &str, lossy: bool) {
        self.line_number += 1;
        if lossy {
            self.warn("line is not valid UTF-8; invalid bytes were replaced");
        }

        let state = std::mem::replace(&mut self.state, ParseState::AwaitingHeader);
        self.state = self.step(state, line);
    }

    fn step(&mut self, state: ParseState, line: &str) -> ParseState {
        let trimmed = line.trim();
        let blank = trimmed.is_empty();
        let header = !blank
            && match &state {
                ParseState::AwaitingHeader => Goroutine::is_header(trimmed),
                _ => Goroutine::is_header_in_goroutine(trimmed),
            };

        match state {
            ParseState::AwaitingHeader => {
                if header {
                    self.start_goroutine(line)
                } else {
                    if !blank && self.config.warn_on_unrecognized {
                        self.warn(format!("unrecognized line outside a goroutine: {trimmed:?}"));
                    }
                    ParseState::AwaitingHeader
                }
            }

            ParseState::InGoroutine(mut goroutine) => {
                if blank || header {
                    self.finalize(goroutine);
                    return if header {
                        self.start_goroutine(line)
                    } else {
                        ParseState::AwaitingHeader
                    };
                }

                if trimmed == ELIDED_MARKER {
                    goroutine.mark_elided();
                } else if trimmed == UNAVAILABLE_MARKER {
                    goroutine.mark_stack_unavailable();
                } else if looks_like_file_line(trimmed) {
                    self.warn(format!("file line without a function line: {trimmed:?}"));
                } else {
                    return self.begin_frame(goroutine, line);
                }
                ParseState::InGoroutine(goroutine)
            }

            ParseState::AwaitingFileLine(mut goroutine, mut frame) => {
                if blank || header {
                    self.warn(format!(
                        "no file line for {:?} before the end of goroutine {}",
                        frame.function_name, goroutine.id
                    ));
                    self.finalize(goroutine);
                    return if header {
                        self.start_goroutine(line)
                    } else {
                        ParseState::AwaitingHeader
                    };
                }

                if trimmed == ELIDED_MARKER {
                    self.warn(format!("no file line for {:?}", frame.function_name));
                    goroutine.mark_elided();
                    return ParseState::InGoroutine(goroutine);
                }

                if trimmed == UNAVAILABLE_MARKER {
                    self.warn(format!("no file line for {:?}", frame.function_name));
                    goroutine.mark_stack_unavailable();
                    return ParseState::InGoroutine(goroutine);
                }

                if self.config.recover_missing_file_lines && looks_like_function_line(trimmed) {
                    self.warn(format!(
                        "no file line for {:?}; {trimmed:?} starts a new frame",
                        frame.function_name
                    ));
                    return self.begin_frame(goroutine, line);
                }

                let warnings = frame.parse_file_line(line);
                self.record(warnings);
                trace!("line {}: frame {}", self.line_number, frame.function_name);
                goroutine.add_frame(frame);
                ParseState::InGoroutine(goroutine)
            }
        }
    }

    fn start_goroutine(&mut self, line: &str) -> ParseState {
        let mut goroutine = Goroutine::new();
        let (warnings, id_parsed) = goroutine.parse_header(line);
        self.record(warnings);

        if id_parsed && !self.seen_ids.insert(goroutine.id) {
            self.warn(format!("duplicate goroutine id {}", goroutine.id));
        }

        trace!(
            "line {}: goroutine {} [{}]",
            self.line_number, goroutine.id, goroutine.state
        );
        ParseState::InGoroutine(goroutine)
    }

    fn begin_frame(&mut self, goroutine: Goroutine, line: &str) -> ParseState {
        let mut frame = StackFrame::new();
        let warnings = frame.parse_function_line(line);
        self.record(warnings);
        ParseState::AwaitingFileLine(goroutine, frame)
    }

    fn finalize(&mut self, goroutine: Goroutine) {
        debug!(
            "goroutine {} closed with {} frames",
            goroutine.id,
            goroutine.frames.len()
        );
        self.dump.push(goroutine);
    }

    fn record(&mut self, warnings: Warnings) {
        self.warnings.extend(warnings.at_line(self.line_number));
    }

    fn warn(&mut self, message: impl Into<String>) {
        let mut warnings = Warnings::new();
        warnings.push(message);
        self.record(warnings);
    }
}

impl Default for DumpParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const SAMPLE_DUMP: &str = "panic: runtime error: invalid memory address or nil pointer dereference
[signal SIGSEGV: segmentation violation code=0x1 addr=0x0 pc=0x47e0b2]

goroutine 1 [running]:
main.(*Cache).Get(0x0, {0x4b6f20, 0x3})
\t/app/cache.go:27 +0x12
main.main()
\t/app/main.go:14 +0x45

goroutine 18 [chan receive, 3 minutes]:
main.worker(0xc00001c0c0)
\t/app/worker.go:9 +0x2e
created by main.main in goroutine 1
\t/app/main.go:11 +0x2c

goroutine 19 [sync.Mutex.Lock]:
sync.runtime_SemacquireMutex(0xc000014098, 0x0, 0x1)
\t/usr/local/go/src/runtime/sema.go:77 +0x25
sync.(*Mutex).lockSlow(0xc000014090)
\t/usr/local/go/src/sync/mutex.go:171 +0x165
created by main.main
\t/app/main.go:12 +0x3a

exit status 2
";

    fn parse(input: &str) -> ParsedDump {
        DumpParser::new().parse_lines(input.lines())
    }

    fn messages(parsed: &ParsedDump) -> Vec<&str> {
        parsed.warnings.iter().map(|w| w.message.as_str()).collect()
    }

    #[test]
    fn single_goroutine_scenario() {
        let parsed = DumpParser::new().parse_lines([
            "goroutine 1 [running]",
            "main.foo(0x0)",
            "\t/src/main.go:10 +0x20",
        ]);

        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.dump.len(), 1);

        let g = parsed.dump.get(1).unwrap();
        assert_eq!(g.state, "running");
        assert_eq!(g.frames.len(), 1);
        assert_eq!(g.frames[0].function_name, "main.foo");
        assert_eq!(g.frames[0].file_name, "/src/main.go");
        assert_eq!(g.frames[0].line_number, 10);
    }

    #[test]
    fn non_numeric_id_scenario() {
        let parsed = DumpParser::new().parse_lines(["goroutine abc [running]"]);

        assert_eq!(parsed.dump.len(), 1);
        assert_eq!(parsed.dump.goroutines()[0].id, 0);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings.as_slice()[0].message.contains("goroutine abc"));
        assert_eq!(parsed.warnings.as_slice()[0].line, Some(1));
    }

    #[test]
    fn blank_line_separates_goroutines() {
        let parsed = parse(
            "goroutine 1 [running]:
main.a()
\t/src/a.go:1 +0x1
main.b()
\t/src/b.go:2 +0x2

goroutine 2 [select]:
main.c()
\t/src/c.go:3 +0x3
",
        );

        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.dump.len(), 2);
        assert_eq!(parsed.dump.get(1).unwrap().frames.len(), 2);
        assert_eq!(parsed.dump.get(2).unwrap().frames.len(), 1);
        assert_eq!(parsed.dump.get(2).unwrap().frames[0].function_name, "main.c");
    }

    #[test]
    fn header_without_blank_line_starts_new_goroutine() {
        let parsed = parse(
            "goroutine 1 [running]:
main.a()
\t/src/a.go:1
goroutine 2 [sleep]:
time.Sleep(0x3b9aca00)
\t/go/src/runtime/time.go:195 +0x135
",
        );

        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.dump.len(), 2);
        assert_eq!(parsed.dump.get(1).unwrap().frames.len(), 1);
        assert_eq!(parsed.dump.get(2).unwrap().frames.len(), 1);
    }

    #[test]
    fn full_sample_dump() {
        let parsed = parse(SAMPLE_DUMP);

        assert_eq!(parsed.dump.len(), 3);
        assert_eq!(parsed.dump.frame_count(), 7);

        let worker = parsed.dump.get(18).unwrap();
        assert_eq!(worker.state, "chan receive");
        assert_eq!(worker.wait_minutes, Some(3));
        assert!(worker.frames[1].created_by);
        assert_eq!(worker.frames[1].function_name, "main.main");

        let locked = parsed.dump.get(19).unwrap();
        assert_eq!(locked.frames[1].package_path, "sync");

        // panic preamble (two lines) and the trailing exit status
        assert_eq!(parsed.warnings.len(), 3);
        let lines: Vec<Option<usize>> = parsed.warnings.iter().map(|w| w.line).collect();
        assert_eq!(lines, [Some(1), Some(2), Some(24)]);
    }

    #[test]
    fn preamble_warnings_can_be_disabled() {
        let config = ParserConfig {
            warn_on_unrecognized: false,
            ..ParserConfig::default()
        };
        let parsed = DumpParser::with_config(config).parse_lines(SAMPLE_DUMP.lines());

        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.dump.len(), 3);
    }

    #[test]
    fn warnings_follow_line_order() {
        let parsed = parse(
            "goroutine x [running]:
main.a
\t/src/a.go
main.b()
\t/src/b.go:2 +0xzz
",
        );

        let lines: Vec<Option<usize>> = parsed.warnings.iter().map(|w| w.line).collect();
        assert_eq!(lines, [Some(1), Some(2), Some(3), Some(5)]);

        // failed pairs are still recorded as frames
        assert_eq!(parsed.dump.goroutines()[0].frames.len(), 2);
    }

    #[test]
    fn duplicate_ids_are_kept_and_reported() {
        let parsed = parse(
            "goroutine 4 [running]:

goroutine 4 [select]:
",
        );

        assert_eq!(parsed.dump.len(), 2);
        assert_eq!(messages(&parsed), ["duplicate goroutine id 4"]);
        assert_eq!(parsed.warnings.as_slice()[0].line, Some(3));
        assert_eq!(parsed.dump.get(4).unwrap().state, "running");
    }

    #[test]
    fn missing_file_line_at_blank_discards_partial_frame() {
        let parsed = parse(
            "goroutine 1 [running]:
main.a()
\t/src/a.go:1 +0x1
main.b()

",
        );

        assert_eq!(parsed.dump.get(1).unwrap().frames.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings.as_slice()[0].line, Some(5));
    }

    #[test]
    fn missing_file_line_at_end_of_input() {
        let parsed = parse("goroutine 1 [running]:\nmain.a()");

        assert_eq!(parsed.dump.len(), 1);
        assert!(parsed.dump.get(1).unwrap().frames.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
        assert!(messages(&parsed)[0].contains("input ended"));
    }

    #[test]
    fn function_line_in_place_of_file_line_recovers() {
        let parsed = parse(
            "goroutine 1 [running]:
main.a()
main.b()
\t/src/b.go:2 +0x2
",
        );

        let frames = &parsed.dump.get(1).unwrap().frames;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].function_name, "main.b");
        assert_eq!(frames[0].line_number, 2);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings.as_slice()[0].line, Some(3));
    }

    #[test]
    fn strict_pairing_reads_next_line_as_file_line() {
        let config = ParserConfig {
            recover_missing_file_lines: false,
            ..ParserConfig::default()
        };
        let parsed = DumpParser::with_config(config).parse_lines([
            "goroutine 1 [running]:",
            "main.a()",
            "main.b()",
        ]);

        let frames = &parsed.dump.get(1).unwrap().frames;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].function_name, "main.a");
        assert_eq!(frames[0].file_name, "");
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn orphan_file_line_is_skipped() {
        let parsed = parse(
            "goroutine 1 [running]:
\t/src/a.go:1 +0x1
main.a()
\t/src/a.go:1 +0x1
",
        );

        assert_eq!(parsed.dump.get(1).unwrap().frames.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(messages(&parsed)[0].contains("without a function line"));
    }

    #[test]
    fn elided_and_unavailable_markers() {
        let parsed = parse(
            "goroutine 1 [running]:
main.deep()
\t/src/deep.go:1 +0x1
...additional frames elided...
created by main.main
\t/src/main.go:9 +0x9

goroutine 2 [running]:
\tgoroutine running on other thread; stack unavailable
",
        );

        assert!(parsed.warnings.is_empty());
        let deep = parsed.dump.get(1).unwrap();
        assert!(deep.frames_elided);
        assert_eq!(deep.frames.len(), 2);
        let busy = parsed.dump.get(2).unwrap();
        assert!(busy.stack_unavailable);
        assert!(busy.frames.is_empty());
    }

    #[test]
    fn unavailable_marker_in_place_of_file_line() {
        let parsed = DumpParser::new().parse_lines([
            "goroutine 2 [running]:",
            "main.a()",
            "\tgoroutine running on other thread; stack unavailable",
        ]);

        let busy = parsed.dump.get(2).unwrap();
        assert!(busy.stack_unavailable);
        assert!(busy.frames.is_empty());
        assert_eq!(messages(&parsed), ["no file line for \"main.a\""]);
        assert_eq!(parsed.warnings.as_slice()[0].line, Some(3));
    }

    #[test]
    fn header_in_place_of_file_line_discards_partial_frame() {
        let parsed = DumpParser::new().parse_lines([
            "goroutine 1 [running]:",
            "main.a()",
            "goroutine 2 [select]:",
            "main.b()",
            "\t/src/b.go:2 +0x2",
        ]);

        assert_eq!(parsed.dump.len(), 2);
        assert!(parsed.dump.get(1).unwrap().frames.is_empty());
        let second = parsed.dump.get(2).unwrap();
        assert_eq!(second.state, "select");
        assert_eq!(second.frames.len(), 1);
        assert_eq!(second.frames[0].function_name, "main.b");

        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings.as_slice()[0].line, Some(3));
        assert!(messages(&parsed)[0].contains("\"main.a\""));
    }

    #[test]
    fn bracketless_header_closes_open_goroutine() {
        let parsed = DumpParser::new().parse_lines([
            "goroutine 1 [running]:",
            "main.a()",
            "\t/src/a.go:1 +0x1",
            "goroutine abc",
        ]);

        assert_eq!(parsed.dump.len(), 2);
        assert_eq!(parsed.dump.get(1).unwrap().frames.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings.as_slice()[0].line, Some(4));
    }

    #[test]
    fn duplicate_zero_ids_are_reported() {
        let parsed = parse(
            "goroutine 0 [idle, 4 hours]:

goroutine 0 [idle, 4 hours]:
",
        );

        assert_eq!(parsed.dump.len(), 2);
        let duplicates: Vec<_> = parsed
            .warnings
            .iter()
            .filter(|w| w.message == "duplicate goroutine id 0")
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].line, Some(3));
    }

    #[test]
    fn unparseable_ids_are_not_duplicates() {
        let parsed = parse(
            "goroutine abc [running]:

goroutine xyz [running]:
",
        );

        assert_eq!(parsed.dump.len(), 2);
        assert!(messages(&parsed).iter().all(|m| !m.contains("duplicate")));
    }

    #[test]
    fn reparsing_written_dump_is_stable() {
        let parsed = parse(SAMPLE_DUMP);

        let mut output = Vec::new();
        parsed.dump.write(&mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let reparsed = parse(&text);

        assert!(reparsed.warnings.is_empty());
        assert_eq!(reparsed.dump, parsed.dump);
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse(SAMPLE_DUMP), parse(SAMPLE_DUMP));
    }

    #[test]
    fn parse_from_reader_handles_crlf_and_invalid_utf8() {
        let mut input = b"goroutine 1 [running]:\r\nmain.f\xff()\r\n\t/src/a.go:1 +0x1\r\n".to_vec();
        input.extend_from_slice(b"\r\n");

        let parsed = DumpParser::new().parse(Cursor::new(input)).unwrap();

        assert_eq!(parsed.dump.len(), 1);
        let frame = &parsed.dump.get(1).unwrap().frames[0];
        assert_eq!(frame.function_name, "main.f\u{fffd}");
        assert_eq!(frame.file_name, "/src/a.go");
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings.as_slice()[0].line, Some(2));
    }

    #[test]
    fn empty_input_yields_empty_dump() {
        let parsed = DumpParser::new().parse(Cursor::new("")).unwrap();

        assert!(parsed.dump.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn streaming_matches_batch() {
        let mut parser = DumpParser::new();
        for line in SAMPLE_DUMP.lines() {
            parser.feed_line(line);
        }

        assert_eq!(parser.finish(), parse(SAMPLE_DUMP));
    }

    #[test]
    fn parser_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<DumpParser>();
    }
}
