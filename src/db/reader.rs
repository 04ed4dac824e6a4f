//! Read side of the database: header validation and dictionary-style
//! lookup over an immutable file.
//!
//! The name index is loaded eagerly (insertion-ordered, so ordinal access
//! is positional); record rows stay on disk and are decoded on demand by
//! seeking to the offset the index stores.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use super::{bincode_config, DbMetadata, SchemaBlock, DB_MAGIC, DB_VERSION, TRAILER_LEN, TRAILER_MAGIC};
use crate::error::{Result, ScreedError};
use crate::record::{Record, Schema};

/// An open, read-only sequence-record database.
///
/// Lookups need a seek, so the file handle lives behind a `RefCell`; the
/// type is not `Sync`, but independent handles to the same file can be
/// opened freely since the file never changes after a build.
#[derive(Debug)]
pub struct ScreedDb {
    path: PathBuf,
    file: RefCell<File>,
    schema: Arc<Schema>,
    // name → absolute offset of the record row, in ordinal order
    index: IndexMap<String, u64>,
    metadata: DbMetadata,
}

impl ScreedDb {
    /// Open and validate a database file.
    ///
    /// # Errors
    ///
    /// [`ScreedError::InvalidDatabase`] with reason `"no such file"` if the
    /// path is absent, `"wrong format"` if the file is not a database at
    /// all, or `"bad header"` if the magic matches but a block fails to
    /// decode.
    pub fn open(path: impl AsRef<Path>) -> Result<ScreedDb> {
        let path = path.as_ref().to_path_buf();
        let bad = |reason: &str| ScreedError::InvalidDatabase {
            path: path.display().to_string(),
            reason: reason.to_string(),
        };

        let mut file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => bad("no such file"),
            _ => ScreedError::Io(e),
        })?;
        let file_len = file.metadata()?.len();
        let min_len = (DB_MAGIC.len() + 4 + 8 + TRAILER_LEN) as u64;
        if file_len < min_len {
            return Err(bad("wrong format"));
        }

        let mut magic = [0u8; 8];
        file.read_exact(&mut magic)?;
        if &magic != DB_MAGIC {
            return Err(bad("wrong format"));
        }

        let mut version = [0u8; 4];
        file.read_exact(&mut version)?;
        if u32::from_le_bytes(version) != DB_VERSION {
            return Err(bad("bad header"));
        }

        // schema block
        let mut blob_len = [0u8; 8];
        file.read_exact(&mut blob_len)?;
        let blob_len = u64::from_le_bytes(blob_len);
        if blob_len > file_len {
            return Err(bad("bad header"));
        }
        let mut blob = vec![0u8; blob_len as usize];
        file.read_exact(&mut blob).map_err(|_| bad("bad header"))?;
        let (schema_block, _) =
            bincode::decode_from_slice::<SchemaBlock, _>(&blob, bincode_config())
                .map_err(|_| bad("bad header"))?;
        let schema = Schema::from_parts(schema_block.format, schema_block.fields)
            .map_err(|_| bad("bad header"))?;

        // trailer
        file.seek(SeekFrom::End(-(TRAILER_LEN as i64)))?;
        let mut word = [0u8; 8];
        file.read_exact(&mut word)?;
        let index_offset = u64::from_le_bytes(word);
        file.read_exact(&mut word)?;
        let meta_offset = u64::from_le_bytes(word);
        file.read_exact(&mut word)?;
        if &word != TRAILER_MAGIC {
            return Err(bad("bad header"));
        }
        if index_offset > file_len || meta_offset > file_len {
            return Err(bad("bad header"));
        }

        // name index
        file.seek(SeekFrom::Start(index_offset))?;
        let mut reader = BufReader::new(&mut file);
        let entries: Vec<(String, u64)> =
            bincode::decode_from_std_read(&mut reader, bincode_config())
                .map_err(|_| bad("bad header"))?;
        let index: IndexMap<String, u64> = entries.into_iter().collect();

        // metadata
        file.seek(SeekFrom::Start(meta_offset))?;
        let mut reader = BufReader::new(&mut file);
        let meta_json: String = bincode::decode_from_std_read(&mut reader, bincode_config())
            .map_err(|_| bad("bad header"))?;
        let metadata: DbMetadata =
            serde_json::from_str(&meta_json).map_err(|_| bad("bad header"))?;

        Ok(ScreedDb {
            path,
            file: RefCell::new(file),
            schema: Arc::new(schema),
            index,
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn metadata(&self) -> &DbMetadata {
        &self.metadata
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Record with the given name key.
    ///
    /// # Errors
    ///
    /// [`ScreedError::NotFound`] if no record has that name.
    pub fn lookup(&self, name: &str) -> Result<Record> {
        match self.index.get_full(name) {
            Some((ordinal, _, &offset)) => self.read_at(ordinal, offset),
            None => Err(ScreedError::NotFound(name.to_string())),
        }
    }

    /// Record at the given 0-based ordinal.
    ///
    /// # Errors
    ///
    /// [`ScreedError::NotFound`] if `index` is not in `0..len()`.
    pub fn lookup_by_index(&self, index: usize) -> Result<Record> {
        match self.index.get_index(index) {
            Some((_, &offset)) => self.read_at(index, offset),
            None => Err(ScreedError::NotFound(format!("record index {index}"))),
        }
    }

    /// Record names in insertion order.
    pub fn iter_keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Records in insertion order.
    pub fn iter_values(&self) -> Values<'_> {
        Values { db: self, pos: 0 }
    }

    /// `(name, record)` pairs in insertion order.
    pub fn iter_items(&self) -> Items<'_> {
        Items { db: self, pos: 0 }
    }

    // The associative-container mutations, present so that callers get a
    // typed refusal instead of a missing method on a store that looks
    // dictionary-shaped. The database is write-once, read-many.

    pub fn insert(&self, _name: &str, _record: &Record) -> Result<()> {
        Err(ScreedError::UnsupportedOperation("insert"))
    }

    pub fn remove(&self, _name: &str) -> Result<()> {
        Err(ScreedError::UnsupportedOperation("remove"))
    }

    pub fn update(&self, _name: &str, _record: &Record) -> Result<()> {
        Err(ScreedError::UnsupportedOperation("update"))
    }

    pub fn clear(&self) -> Result<()> {
        Err(ScreedError::UnsupportedOperation("clear"))
    }

    fn read_at(&self, ordinal: usize, offset: u64) -> Result<Record> {
        let corrupt = || ScreedError::InvalidDatabase {
            path: self.path.display().to_string(),
            reason: "corrupt record block".to_string(),
        };

        let mut file = self.file.borrow_mut();
        file.seek(SeekFrom::Start(offset))?;
        let mut reader = BufReader::new(&mut *file);
        let values: Vec<String> =
            bincode::decode_from_std_read(&mut reader, bincode_config())
                .map_err(|_| corrupt())?;
        if values.len() != self.schema.text_fields().len() {
            return Err(corrupt());
        }
        Ok(Record::new(self.schema.clone(), ordinal, values))
    }
}

pub struct Values<'a> {
    db: &'a ScreedDb,
    pos: usize,
}

impl Iterator for Values<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, &offset) = self.db.index.get_index(self.pos)?;
        let rec = self.db.read_at(self.pos, offset);
        self.pos += 1;
        Some(rec)
    }
}

pub struct Items<'a> {
    db: &'a ScreedDb,
    pos: usize,
}

impl<'a> Iterator for Items<'a> {
    type Item = Result<(&'a str, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (name, &offset) = self.db.index.get_index(self.pos)?;
        let rec = self.db.read_at(self.pos, offset);
        self.pos += 1;
        Some(rec.map(|r| (name.as_str(), r)))
    }
}
