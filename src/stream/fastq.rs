//! Streaming FASTQ parser.

use std::io::BufRead;
use std::sync::Arc;

use crate::error::Result;
use crate::record::{Record, Schema};
use crate::stream::{split_header, LineReader, ParseOptions};

/// Four-state machine: `@` header, sequence lines up to the separator,
/// the separator itself (`+`, with `#` tolerated for compatibility with
/// files seen in the wild), then quality lines until the accumulated
/// quality length matches the sequence length. Quality lines are read by
/// length, never by sniffing, so a quality line starting with `@` is fine.
pub struct FastqParser {
    lines: LineReader,
    schema: Arc<Schema>,
    options: ParseOptions,
    next_index: usize,
    done: bool,
}

impl FastqParser {
    pub fn new<R: BufRead + 'static>(reader: R, options: ParseOptions) -> Self {
        Self::from_lines(LineReader::new(Box::new(reader)), options)
    }

    pub(crate) fn from_lines(lines: LineReader, options: ParseOptions) -> Self {
        FastqParser {
            lines,
            schema: Schema::fastq(),
            options,
            next_index: 0,
            done: false,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        // header, skipping blank lines between records
        let header = loop {
            match self.lines.next_line()? {
                None => {
                    self.done = true;
                    return Ok(None);
                }
                Some(l) if l.trim().is_empty() => continue,
                Some(l) => break l,
            }
        };
        let Some(rest) = header.strip_prefix('@') else {
            return Err(self.lines.format_err("no '@' at line start"));
        };
        let (name, annotations) = split_header(rest, self.options);

        // sequence lines until the separator
        let mut sequence = String::new();
        loop {
            match self.lines.next_line()? {
                None => {
                    return Err(self
                        .lines
                        .format_err(format!("unexpected end of file in record '{name}'")));
                }
                Some(l) if l.starts_with('+') || l.starts_with('#') => break,
                Some(l) => sequence.push_str(l.trim()),
            }
        }

        // quality lines until the lengths line up
        let mut quality = String::new();
        while quality.len() < sequence.len() {
            match self.lines.next_line()? {
                None => {
                    return Err(self.lines.format_err(format!(
                        "sequence/quality length mismatch in record '{name}'"
                    )));
                }
                Some(l) => quality.push_str(l.trim()),
            }
        }
        if quality.len() > sequence.len() {
            return Err(self.lines.format_err(format!(
                "sequence/quality length mismatch in record '{name}'"
            )));
        }

        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(Record::new(
            self.schema.clone(),
            index,
            vec![name, annotations, sequence, quality],
        )))
    }
}

impl Iterator for FastqParser {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
