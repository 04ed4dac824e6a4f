use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScreedError>;

/// Everything that can go wrong in this crate, one variant per kind.
///
/// Parse errors carry their position in the message; the caller decides
/// whether to retry, so nothing here is retried or swallowed internally.
#[derive(Error, Debug)]
pub enum ScreedError {
    /// A missing file on open, or a missing key on lookup.
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The first non-empty line of the input started with neither `>` nor `@`.
    #[error("could not detect sequence format of {0}: expected a '>' or '@' header")]
    UnknownFormat(String),

    /// Readable bytes that violate the format grammar, e.g. a missing header
    /// marker or a sequence/quality length mismatch.
    #[error("malformed input: {0}")]
    Format(String),

    #[error("invalid database {path}: {reason}")]
    InvalidDatabase { path: String, reason: String },

    #[error("sequence contains non-DNA character {0:?}")]
    Alphabet(char),

    /// A mutation was attempted on a read-only database.
    #[error("database is read-only: {0} is not supported")]
    UnsupportedOperation(&'static str),
}
