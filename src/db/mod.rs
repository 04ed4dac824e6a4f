//! On-disk database format.
//!
//! Layout, all fixed-width integers little-endian:
//!
//! ```text
//! magic    b"screeddb"                                     8 bytes
//! version  u32                                             4 bytes
//! schema   u64 blob length, then a bincode SchemaBlock
//! records  N bincode rows (Vec<String>), ordinal order
//! index    bincode Vec<(name, absolute record offset)>, ordinal order
//! meta     bincode String holding the metadata JSON
//! trailer  index offset u64 · meta offset u64 · b"screedix"   24 bytes
//! ```
//!
//! The trailer lets the builder stay single-pass (counts and offsets are
//! only known at the end) while the reader can still seek straight to the
//! index. Blocks are encoded with bincode's fixed-int little-endian
//! configuration, so every record row is a length-prefixed list of
//! length-prefixed field values matching the schema order.

pub mod builder;
pub mod reader;

pub use builder::{build, build_from_stream, DbWriter};
pub use reader::{Items, Values, ScreedDb};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::ScreedError;
use crate::record::{FieldDef, Format};

/// Canonical suffix appended to the source filename.
pub const DB_SUFFIX: &str = "_screed";

pub const DB_MAGIC: &[u8; 8] = b"screeddb";
pub const TRAILER_MAGIC: &[u8; 8] = b"screedix";
pub const DB_VERSION: u32 = 1;
pub const TRAILER_LEN: usize = 8 + 8 + 8;

/// Database path for a given source file: the source path with
/// [`DB_SUFFIX`] appended.
pub fn db_path_for(source: impl AsRef<Path>) -> PathBuf {
    let mut os: OsString = source.as_ref().as_os_str().to_os_string();
    os.push(DB_SUFFIX);
    PathBuf::from(os)
}

/// Schema header as stored on disk.
#[derive(Debug, Encode, Decode)]
pub(crate) struct SchemaBlock {
    pub format: Format,
    pub fields: Vec<FieldDef>,
}

/// Build-time facts recorded in the database and reported by `info`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DbMetadata {
    pub screed_version: String,
    pub source_path: String,
    pub build_date: String,
    pub elapsed: f64,
    pub record_count: usize,
    pub total_residues: u64,
    pub avg_len: f64,
}

pub(crate) fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard().with_fixed_int_encoding()
}

pub(crate) fn encode_err(e: bincode::error::EncodeError) -> ScreedError {
    ScreedError::Io(std::io::Error::other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_appended_to_the_full_path() {
        assert_eq!(
            db_path_for("dir/test.fa"),
            PathBuf::from("dir/test.fa_screed")
        );
    }
}
