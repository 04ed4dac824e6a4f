//! screed: a read-only, on-disk store of biological sequence records.
//!
//! FASTA and FASTQ inputs (plain, gzip or bzip2 compressed) stream through
//! format parsers into a packed database file keyed by record name and by
//! insertion ordinal. An open database behaves like a dictionary: lookup,
//! containment, length and ordered iteration, with mutation refused.
//! Records round-trip back out as FASTA or FASTQ text.
//!
//! ```no_run
//! use screed::{build, ScreedDb};
//!
//! # fn main() -> screed::Result<()> {
//! let db_path = build("reads.fa")?;
//! let db = ScreedDb::open(db_path)?;
//! let rec = db.lookup("read_17")?;
//! println!("{}", rec.sequence().unwrap_or(""));
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod db;
pub mod dna;
pub mod error;
pub mod pair;
pub mod record;
pub mod stream;

pub use convert::{dump_fasta, dump_fastq, write_fasta, write_fastq, RecordWriter};
pub use db::{build, build_from_stream, db_path_for, DbMetadata, DbWriter, ScreedDb, DB_SUFFIX};
pub use error::{Result, ScreedError};
pub use pair::{pair_records, PairedRecords};
pub use record::{FieldDef, FieldRole, Format, Record, Schema};
pub use stream::{open_reader, open_reader_with, ParseOptions, RecordStream};
