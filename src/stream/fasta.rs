//! Streaming FASTA parser.

use std::io::BufRead;
use std::sync::Arc;

use crate::error::Result;
use crate::record::{Record, Schema};
use crate::stream::{split_header, LineReader, ParseOptions};

/// Two-state machine: seek a `>` header, then accumulate sequence lines
/// until the next header or EOF. Blank lines inside a sequence block
/// contribute nothing and do not terminate the record.
pub struct FastaParser {
    lines: LineReader,
    schema: Arc<Schema>,
    options: ParseOptions,
    next_index: usize,
    // header of the record currently being read, parsed ahead of its body
    pending: Option<(String, String)>,
    done: bool,
}

impl FastaParser {
    pub fn new<R: BufRead + 'static>(reader: R, options: ParseOptions) -> Self {
        Self::from_lines(LineReader::new(Box::new(reader)), options)
    }

    pub(crate) fn from_lines(lines: LineReader, options: ParseOptions) -> Self {
        FastaParser {
            lines,
            schema: Schema::fasta(),
            options,
            next_index: 0,
            pending: None,
            done: false,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn seek_header(&mut self) -> Result<Option<(String, String)>> {
        loop {
            match self.lines.next_line()? {
                None => return Ok(None),
                Some(l) if l.trim().is_empty() => continue,
                Some(l) => {
                    let Some(rest) = l.strip_prefix('>') else {
                        return Err(self.lines.format_err("no '>' at line start"));
                    };
                    return Ok(Some(split_header(rest, self.options)));
                }
            }
        }
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        let header = match self.pending.take() {
            Some(h) => Some(h),
            None => self.seek_header()?,
        };
        let Some((name, description)) = header else {
            self.done = true;
            return Ok(None);
        };

        let mut sequence = String::new();
        loop {
            match self.lines.next_line()? {
                None => {
                    self.done = true;
                    break;
                }
                Some(l) => {
                    if let Some(rest) = l.strip_prefix('>') {
                        self.pending = Some(split_header(rest, self.options));
                        break;
                    }
                    sequence.push_str(l.trim());
                }
            }
        }

        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(Record::new(
            self.schema.clone(),
            index,
            vec![name, description, sequence],
        )))
    }
}

impl Iterator for FastaParser {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScreedError;
    use std::io::Cursor;

    fn parse(input: &str) -> Result<Vec<Record>> {
        FastaParser::new(Cursor::new(input.to_string()), ParseOptions::default()).collect()
    }

    #[test]
    fn single_record() {
        let records = parse(">ENSMICT00000012722 desc\nACGT\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "ENSMICT00000012722");
        assert_eq!(records[0].description(), Some("desc"));
        assert_eq!(records[0].sequence(), Some("ACGT"));
        assert_eq!(records[0].index(), 0);
    }

    #[test]
    fn multi_line_sequence_and_blank_lines() {
        let records = parse(">r1\nACGT\n\nTTTT\n>r2 two words here\nGG\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence(), Some("ACGTTTTT"));
        assert_eq!(records[1].name(), "r2");
        assert_eq!(records[1].description(), Some("two words here"));
        assert_eq!(records[1].index(), 1);
    }

    #[test]
    fn header_without_description() {
        let records = parse(">r1\nAC\n").unwrap();
        assert_eq!(records[0].name(), "r1");
        assert_eq!(records[0].description(), Some(""));
    }

    #[test]
    fn verbatim_name_when_not_parsing_description() {
        let options = ParseOptions {
            parse_description: false,
        };
        let records: Vec<_> = FastaParser::new(
            Cursor::new(">r1 full header kept\nAC\n".to_string()),
            options,
        )
        .collect::<Result<_>>()
        .unwrap();
        assert_eq!(records[0].name(), "r1 full header kept");
        assert_eq!(records[0].description(), Some(""));
    }

    #[test]
    fn missing_header_is_a_format_error() {
        let err = parse("ACGT\n>r1\nAC\n").unwrap_err();
        assert!(matches!(err, ScreedError::Format(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn record_with_empty_sequence() {
        let records = parse(">r1 desc\n>r2\nACGT\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence(), Some(""));
        assert_eq!(records[1].sequence(), Some("ACGT"));
    }
}
