//! Write records back out as FASTA or FASTQ text.
//!
//! Output is parseable by the matching parser in this crate; that
//! round-trip is what the integration tests pin down. Sequence and
//! quality lines wrap at a fixed 80 columns.

use std::io::Write;

use crate::db::ScreedDb;
use crate::error::{Result, ScreedError};
use crate::record::Record;

pub const WRAP_WIDTH: usize = 80;

/// Quality byte used when a record has no quality of its own: ASCII `"`,
/// "unknown/low" in the output convention.
pub const SYNTHETIC_QUALITY: char = '"';

fn wrap_into(out: &mut impl Write, s: &str) -> std::io::Result<()> {
    for chunk in s.as_bytes().chunks(WRAP_WIDTH) {
        out.write_all(chunk)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn sequence_of<'a>(rec: &'a Record) -> Result<&'a str> {
    rec.sequence().ok_or_else(|| {
        ScreedError::Format(format!("record '{}' has no sequence field", rec.name()))
    })
}

fn header_of(rec: &Record) -> String {
    // description for FASTA records, annotations for FASTQ ones
    let meta = rec
        .description()
        .or_else(|| rec.get("annotations"))
        .unwrap_or("");
    if meta.is_empty() {
        rec.name().to_string()
    } else {
        format!("{} {}", rec.name(), meta)
    }
}

/// Write one record as FASTA.
pub fn write_fasta(out: &mut impl Write, rec: &Record) -> Result<()> {
    let sequence = sequence_of(rec)?;
    writeln!(out, ">{}", header_of(rec))?;
    wrap_into(out, sequence)?;
    Ok(())
}

/// Write one record as FASTQ, synthesising a constant quality string when
/// the record has none.
pub fn write_fastq(out: &mut impl Write, rec: &Record) -> Result<()> {
    let sequence = sequence_of(rec)?;
    writeln!(out, "@{}", header_of(rec))?;
    wrap_into(out, sequence)?;
    writeln!(out, "+")?;
    match rec.quality() {
        Some(quality) => wrap_into(out, quality)?,
        None => {
            let synthetic = SYNTHETIC_QUALITY.to_string().repeat(sequence.len());
            wrap_into(out, &synthetic)?;
        }
    }
    Ok(())
}

/// Dump an entire database as FASTA, in insertion order.
pub fn dump_fasta(db: &ScreedDb, out: &mut impl Write) -> Result<()> {
    for rec in db.iter_values() {
        write_fasta(out, &rec?)?;
    }
    Ok(())
}

/// Dump an entire database as FASTQ, in insertion order.
pub fn dump_fastq(db: &ScreedDb, out: &mut impl Write) -> Result<()> {
    for rec in db.iter_values() {
        write_fastq(out, &rec?)?;
    }
    Ok(())
}

/// Output format picked from a record's shape: records carrying a
/// `quality` field are written as FASTQ, everything else as FASTA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordWriter {
    Fasta,
    Fastq,
}

impl RecordWriter {
    pub fn for_record(rec: &Record) -> RecordWriter {
        if rec.schema().has_quality() {
            RecordWriter::Fastq
        } else {
            RecordWriter::Fasta
        }
    }

    pub fn write(&self, out: &mut impl Write, rec: &Record) -> Result<()> {
        match self {
            RecordWriter::Fasta => write_fasta(out, rec),
            RecordWriter::Fastq => write_fastq(out, rec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Schema;
    use crate::stream::{FastaParser, FastqParser, ParseOptions};
    use std::io::Cursor;

    fn fasta_record(name: &str, desc: &str, seq: &str) -> Record {
        Record::new(
            Schema::fasta(),
            0,
            vec![name.to_string(), desc.to_string(), seq.to_string()],
        )
    }

    #[test]
    fn fasta_output_reparses_to_the_same_record() {
        let rec = fasta_record("r1", "a description", &"ACGT".repeat(50));
        let mut buf = Vec::new();
        write_fasta(&mut buf, &rec).unwrap();

        // wrapped at 80 columns: 200 bases over three lines
        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().skip(1).all(|l| l.len() <= WRAP_WIDTH));

        let reparsed: Vec<_> = FastaParser::new(Cursor::new(buf), ParseOptions::default())
            .collect::<crate::error::Result<_>>()
            .unwrap();
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed[0], rec);
    }

    #[test]
    fn fastq_output_synthesises_quality() {
        let rec = fasta_record("r1", "", "ACGTACGT");
        let mut buf = Vec::new();
        write_fastq(&mut buf, &rec).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "@r1\nACGTACGT\n+\n\"\"\"\"\"\"\"\"\n");
    }

    #[test]
    fn fastq_output_reparses_with_quality_preserved() {
        let rec = Record::new(
            Schema::fastq(),
            0,
            vec![
                "r1".to_string(),
                "lane=2".to_string(),
                "ACGT".to_string(),
                "!#%!".to_string(),
            ],
        );
        let mut buf = Vec::new();
        write_fastq(&mut buf, &rec).unwrap();

        let reparsed: Vec<_> = FastqParser::new(Cursor::new(buf), ParseOptions::default())
            .collect::<crate::error::Result<_>>()
            .unwrap();
        assert_eq!(reparsed[0], rec);
    }

    #[test]
    fn writer_dispatch_follows_quality_field() {
        let fasta = fasta_record("r1", "", "AC");
        assert_eq!(RecordWriter::for_record(&fasta), RecordWriter::Fasta);

        let fastq = Record::new(
            Schema::fastq(),
            0,
            vec![
                "r1".to_string(),
                String::new(),
                "AC".to_string(),
                "!!".to_string(),
            ],
        );
        assert_eq!(RecordWriter::for_record(&fastq), RecordWriter::Fastq);
    }
}
