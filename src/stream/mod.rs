//! Stream source: opens a path, transparently decompresses, probes the
//! format, and hands back a lazy record stream.
//!
//! Compression is detected from magic bytes, never the file extension, so
//! renamed files parse correctly. The parsers underneath only ever see a
//! line reader and stay oblivious to the compression layer.

pub mod fasta;
pub mod fastq;
pub mod hava;

pub use fasta::FastaParser;
pub use fastq::FastqParser;
pub use hava::HavaParser;

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::sync::Arc;

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;

use crate::error::{Result, ScreedError};
use crate::record::{Format, Record, Schema};

pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
pub const BZIP2_MAGIC: [u8; 3] = [0x42, 0x5a, 0x68];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    Plain,
    Gzip,
    Bzip2,
}

fn sniff_compression(head: &[u8]) -> Compression {
    if head.starts_with(&GZIP_MAGIC) {
        Compression::Gzip
    } else if head.starts_with(&BZIP2_MAGIC) {
        Compression::Bzip2
    } else {
        Compression::Plain
    }
}

/// Parser options shared by every format.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Split the header into name and description at the first whitespace.
    /// When false the whole post-marker line is kept verbatim as the name.
    pub parse_description: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            parse_description: true,
        }
    }
}

/// Line-oriented reader with a one-line pushback slot, shared by all
/// parsers. Lines come back with the terminator stripped; the counter is
/// 1-based and names the last line returned, for error positions.
pub(crate) struct LineReader {
    inner: Box<dyn BufRead>,
    pushed: Option<String>,
    line: u64,
}

impl LineReader {
    pub(crate) fn new(inner: Box<dyn BufRead>) -> Self {
        LineReader {
            inner,
            pushed: None,
            line: 0,
        }
    }

    /// Next line without its terminator, or `None` at EOF.
    pub(crate) fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pushed.take() {
            return Ok(Some(line));
        }
        let mut buf = String::new();
        let n = self.inner.read_line(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        self.line += 1;
        Ok(Some(buf))
    }

    /// Return the most recently read line to the stream. The line counter
    /// is not rewound; the line keeps its original position.
    pub(crate) fn push_back(&mut self, line: String) {
        debug_assert!(self.pushed.is_none());
        self.pushed = Some(line);
    }

    /// A format error positioned at the current line.
    pub(crate) fn format_err(&self, msg: impl std::fmt::Display) -> ScreedError {
        ScreedError::Format(format!("{} (line {})", msg, self.line))
    }
}

/// Split a header line (already stripped of its `>`/`@` marker) into name
/// and description according to the options.
pub(crate) fn split_header(line: &str, options: ParseOptions) -> (String, String) {
    if !options.parse_description {
        return (line.to_string(), String::new());
    }
    match line.split_once(|c: char| c.is_whitespace()) {
        Some((name, description)) => (name.to_string(), description.trim().to_string()),
        None => (line.to_string(), String::new()),
    }
}

/// A lazy, forward-only stream of records from one input. Not restartable;
/// re-opening is the caller's responsibility.
pub enum RecordStream {
    Fasta(FastaParser),
    Fastq(FastqParser),
    Hava(HavaParser),
    /// Produced for inputs with no content at all: nothing to probe, and
    /// the contract is an empty stream rather than a format error.
    Empty,
}

impl RecordStream {
    pub fn format(&self) -> Option<Format> {
        match self {
            RecordStream::Fasta(_) => Some(Format::Fasta),
            RecordStream::Fastq(_) => Some(Format::Fastq),
            RecordStream::Hava(_) => Some(Format::Hava),
            RecordStream::Empty => None,
        }
    }

    /// Schema of the records this stream yields. An empty stream reports
    /// the FASTA schema so that building from it still produces a valid
    /// (empty) database.
    pub fn schema(&self) -> Arc<Schema> {
        match self {
            RecordStream::Fasta(p) => p.schema().clone(),
            RecordStream::Fastq(p) => p.schema().clone(),
            RecordStream::Hava(p) => p.schema().clone(),
            RecordStream::Empty => Schema::fasta(),
        }
    }
}

impl Iterator for RecordStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            RecordStream::Fasta(p) => p.next(),
            RecordStream::Fastq(p) => p.next(),
            RecordStream::Hava(p) => p.next(),
            RecordStream::Empty => None,
        }
    }
}

/// Open `path`, decompress if needed, probe the first non-empty line and
/// return the matching record stream.
///
/// # Errors
///
/// * [`ScreedError::NotFound`] if the file does not exist.
/// * [`ScreedError::UnknownFormat`] if the first non-empty line starts with
///   neither `>` nor `@`.
/// * [`ScreedError::Io`] on read failures.
pub fn open_reader(path: impl AsRef<Path>) -> Result<RecordStream> {
    open_reader_with(path, None, ParseOptions::default())
}

/// [`open_reader`] with an explicit format (skipping the probe; this is the
/// only way to stream the hava example format) and parser options.
pub fn open_reader_with(
    path: impl AsRef<Path>,
    format: Option<Format>,
    options: ParseOptions,
) -> Result<RecordStream> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScreedError::NotFound(path.display().to_string()),
        _ => ScreedError::Io(e),
    })?;

    let mut buffered = BufReader::new(file);
    let compression = sniff_compression(buffered.fill_buf()?);
    let reader: Box<dyn BufRead> = match compression {
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(buffered))),
        Compression::Bzip2 => Box::new(BufReader::new(BzDecoder::new(buffered))),
        Compression::Plain => Box::new(buffered),
    };
    let mut lines = LineReader::new(reader);

    if let Some(format) = format {
        return Ok(match format {
            Format::Fasta => RecordStream::Fasta(FastaParser::from_lines(lines, options)),
            Format::Fastq => RecordStream::Fastq(FastqParser::from_lines(lines, options)),
            Format::Hava => RecordStream::Hava(HavaParser::from_lines(lines)),
        });
    }

    // probe: the first non-empty line selects the parser
    let first = loop {
        match lines.next_line()? {
            None => return Ok(RecordStream::Empty),
            Some(l) if l.trim().is_empty() => continue,
            Some(l) => break l,
        }
    };

    match first.as_bytes().first() {
        Some(b'>') => {
            lines.push_back(first);
            Ok(RecordStream::Fasta(FastaParser::from_lines(lines, options)))
        }
        Some(b'@') => {
            lines.push_back(first);
            Ok(RecordStream::Fastq(FastqParser::from_lines(lines, options)))
        }
        _ => Err(ScreedError::UnknownFormat(path.display().to_string())),
    }
}
