//! Single-pass database builder.
//!
//! Records are staged into a temporary file next to the output while the
//! name index and offsets accumulate in memory; `finish` then assembles
//! header, record block, index, metadata and trailer into the final file.
//! The OS reclaims the staging file on its own, and a failure while
//! assembling unlinks the partial output before the error surfaces.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use log::info;
use tempfile::tempfile_in;

use super::{
    bincode_config, db_path_for, encode_err, DbMetadata, SchemaBlock, DB_MAGIC, DB_VERSION,
    TRAILER_MAGIC,
};
use crate::error::{Result, ScreedError};
use crate::record::{Record, Schema};
use crate::stream::{open_reader, RecordStream};

pub struct DbWriter {
    records: BufWriter<File>,
    // name → offset of the record within the record block
    index: IndexMap<String, u64>,
    offset: u64,
    out_path: PathBuf,
    schema: Arc<Schema>,
    pub metadata: DbMetadata,
}

impl DbWriter {
    /// Create a writer whose output lands at `source` + `_screed`. An
    /// existing file at that path is overwritten when `finish` runs;
    /// callers that need the old database must move it away first.
    pub fn create(source: &Path, schema: Arc<Schema>) -> Result<Self> {
        let out_path = db_path_for(source);

        // stage the record block in the output directory so the final
        // assembly copies within one filesystem
        let mut tempfile_dir = std::path::absolute(&out_path)?;
        tempfile_dir.pop();
        let temp = tempfile_in(tempfile_dir)?;

        let source_path = std::fs::canonicalize(source)
            .unwrap_or_else(|_| source.to_path_buf())
            .display()
            .to_string();

        Ok(DbWriter {
            records: BufWriter::new(temp),
            index: IndexMap::new(),
            offset: 0,
            out_path,
            schema,
            metadata: DbMetadata {
                screed_version: env!("CARGO_PKG_VERSION").to_string(),
                source_path,
                build_date: chrono::Local::now().to_rfc3339(),
                ..DbMetadata::default()
            },
        })
    }

    pub fn path(&self) -> &Path {
        &self.out_path
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Append one record. Ordinals are implicit in write order.
    ///
    /// # Errors
    ///
    /// Fails with [`ScreedError::Format`] if the record's name was already
    /// written; the name index requires unique keys.
    pub fn write_record(&mut self, rec: &Record) -> Result<()> {
        let name = rec.name();
        if self.index.contains_key(name) {
            return Err(ScreedError::Format(format!(
                "duplicate record name '{}' (record {})",
                name, self.metadata.record_count
            )));
        }

        let written = bincode::encode_into_std_write(
            rec.values(),
            &mut self.records,
            bincode_config(),
        )
        .map_err(encode_err)?;

        self.index.insert(name.to_string(), self.offset);
        self.offset += written as u64;
        self.metadata.record_count += 1;
        if let Some(seq) = rec.sequence() {
            self.metadata.total_residues += seq.len() as u64;
        }
        Ok(())
    }

    /// Assemble the final database file and return its path.
    pub fn finish(self) -> Result<PathBuf> {
        let DbWriter {
            records,
            index,
            offset,
            out_path,
            schema,
            mut metadata,
        } = self;

        let mut temp = records
            .into_inner()
            .map_err(|e| ScreedError::Io(e.into_error()))?;

        if metadata.record_count > 0 {
            metadata.avg_len =
                metadata.total_residues as f64 / metadata.record_count as f64;
        }

        info!("writing database to {}", out_path.display());
        let mut out = BufWriter::new(File::create(&out_path)?);

        // header
        out.write_all(DB_MAGIC)?;
        out.write_all(&DB_VERSION.to_le_bytes())?;
        let schema_blob = bincode::encode_to_vec(
            SchemaBlock {
                format: schema.format(),
                fields: schema.fields().to_vec(),
            },
            bincode_config(),
        )
        .map_err(encode_err)?;
        out.write_all(&(schema_blob.len() as u64).to_le_bytes())?;
        out.write_all(&schema_blob)?;
        let records_start = (DB_MAGIC.len() + 4 + 8 + schema_blob.len()) as u64;

        // record block
        temp.seek(SeekFrom::Start(0))?;
        io::copy(&mut temp, &mut out)?;

        // name index, rebased onto absolute offsets
        let index_offset = records_start + offset;
        let entries: Vec<(String, u64)> = index
            .into_iter()
            .map(|(name, off)| (name, records_start + off))
            .collect();
        let index_len =
            bincode::encode_into_std_write(&entries, &mut out, bincode_config())
                .map_err(encode_err)?;

        // metadata
        let meta_offset = index_offset + index_len as u64;
        let meta_json = serde_json::to_string(&metadata)
            .map_err(|e| ScreedError::Io(std::io::Error::other(e)))?;
        bincode::encode_into_std_write(&meta_json, &mut out, bincode_config())
            .map_err(encode_err)?;

        // trailer
        out.write_all(&index_offset.to_le_bytes())?;
        out.write_all(&meta_offset.to_le_bytes())?;
        out.write_all(TRAILER_MAGIC)?;
        out.flush()?;

        Ok(out_path)
    }
}

/// Build a database from a sequence file, auto-detecting compression and
/// format. The output path is the input path with `_screed` appended.
pub fn build(input: impl AsRef<Path>) -> Result<PathBuf> {
    let input = input.as_ref();
    let stream = open_reader(input)?;
    build_from_stream(input, stream)
}

/// Build a database at `input` + `_screed` from an already-open stream.
///
/// # Errors
///
/// Any parse or I/O error propagates; a partially written output file is
/// unlinked first.
pub fn build_from_stream(input: &Path, stream: RecordStream) -> Result<PathBuf> {
    let started = Instant::now();
    let mut wtr = DbWriter::create(input, stream.schema())?;
    let out_path = wtr.path().to_path_buf();

    let result = (|| {
        for rec in stream {
            wtr.write_record(&rec?)?;
            let n = wtr.metadata.record_count;
            if n % 50_000 == 0 {
                info!("processed: {n}");
            }
        }
        wtr.metadata.elapsed = started.elapsed().as_secs_f64();
        wtr.finish()
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&out_path);
    }
    result
}
