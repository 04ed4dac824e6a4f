//! Parser for the six-field "hava" example format.
//!
//! One field per line, six lines per record, the first being the record
//! name. The format exists to show that the parser layer is pluggable:
//! a new format needs a schema and an iterator, nothing else.

use std::io::BufRead;
use std::sync::Arc;

use crate::error::Result;
use crate::record::{Record, Schema};
use crate::stream::LineReader;

pub struct HavaParser {
    lines: LineReader,
    schema: Arc<Schema>,
    next_index: usize,
    done: bool,
}

impl HavaParser {
    pub fn new<R: BufRead + 'static>(reader: R) -> Self {
        Self::from_lines(LineReader::new(Box::new(reader)))
    }

    pub(crate) fn from_lines(lines: LineReader) -> Self {
        HavaParser {
            lines,
            schema: Schema::hava(),
            next_index: 0,
            done: false,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        // first field, skipping blank lines between records
        let hava = loop {
            match self.lines.next_line()? {
                None => {
                    self.done = true;
                    return Ok(None);
                }
                Some(l) if l.trim().is_empty() => continue,
                Some(l) => break l.trim().to_string(),
            }
        };

        let mut values = Vec::with_capacity(self.schema.text_fields().len());
        values.push(hava);
        for _ in 1..self.schema.text_fields().len() {
            match self.lines.next_line()? {
                None => {
                    return Err(self
                        .lines
                        .format_err("unexpected end of file inside hava record"));
                }
                Some(l) => values.push(l.trim().to_string()),
            }
        }

        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(Record::new(self.schema.clone(), index, values)))
    }
}

impl Iterator for HavaParser {
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
