//! Schema-driven sequence records.
//!
//! Every record is a small, fixed set of named text fields described by a
//! [`Schema`]: one field is the textual name key, at most one is sliceable
//! (the biological sequence), and the leading `id` field is the 0-based
//! ordinal assigned in input order. The schema for each input format is
//! fixed at parse time and written into the database header, so a reader
//! can reconstruct records without knowing the source format in advance.

use std::ops::Range;
use std::sync::Arc;

use bincode::{Decode, Encode};

/// The recognised input formats. The set is closed; adding a format means
/// adding a parser and a schema next to the existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum Format {
    Fasta,
    Fastq,
    Hava,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Fasta => "fasta",
            Format::Fastq => "fastq",
            Format::Hava => "hava",
        }
    }
}

/// Role of a field within a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum FieldRole {
    /// The 0-based record ordinal. Implicit in table position on disk.
    PrimaryKey,
    /// Textual name, unique across the records of a database.
    IndexedTextKey,
    /// Opaque text.
    StandardText,
    /// Opaque text supporting sub-range reads.
    SliceableText,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct FieldDef {
    pub name: String,
    pub role: FieldRole,
}

impl FieldDef {
    fn new(name: &str, role: FieldRole) -> Self {
        FieldDef {
            name: name.to_string(),
            role,
        }
    }
}

/// An ordered field list headed by the `id` primary key.
///
/// The text fields (everything after `id`) align 1:1 with the value vector
/// of each [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    format: Format,
    fields: Vec<FieldDef>,
    // positions into the text-field slice, cached at construction
    key_pos: usize,
    sliceable_pos: Option<usize>,
}

impl Schema {
    /// `name` (indexed), `description`, `sequence` (sliceable).
    pub fn fasta() -> Arc<Schema> {
        Arc::new(Schema {
            format: Format::Fasta,
            fields: vec![
                FieldDef::new("id", FieldRole::PrimaryKey),
                FieldDef::new("name", FieldRole::IndexedTextKey),
                FieldDef::new("description", FieldRole::StandardText),
                FieldDef::new("sequence", FieldRole::SliceableText),
            ],
            key_pos: 0,
            sliceable_pos: Some(2),
        })
    }

    /// `name` (indexed), `annotations`, `sequence`, `quality`.
    pub fn fastq() -> Arc<Schema> {
        Arc::new(Schema {
            format: Format::Fastq,
            fields: vec![
                FieldDef::new("id", FieldRole::PrimaryKey),
                FieldDef::new("name", FieldRole::IndexedTextKey),
                FieldDef::new("annotations", FieldRole::StandardText),
                FieldDef::new("sequence", FieldRole::StandardText),
                FieldDef::new("quality", FieldRole::StandardText),
            ],
            key_pos: 0,
            sliceable_pos: None,
        })
    }

    /// The six-field example format exercising the pluggable parser layer.
    pub fn hava() -> Arc<Schema> {
        Arc::new(Schema {
            format: Format::Hava,
            fields: vec![
                FieldDef::new("id", FieldRole::PrimaryKey),
                FieldDef::new("hava", FieldRole::IndexedTextKey),
                FieldDef::new("quarzk", FieldRole::StandardText),
                FieldDef::new("muchalo", FieldRole::StandardText),
                FieldDef::new("fakours", FieldRole::StandardText),
                FieldDef::new("selimizicka", FieldRole::StandardText),
                FieldDef::new("marshoon", FieldRole::StandardText),
            ],
            key_pos: 0,
            sliceable_pos: None,
        })
    }

    pub fn for_format(format: Format) -> Arc<Schema> {
        match format {
            Format::Fasta => Schema::fasta(),
            Format::Fastq => Schema::fastq(),
            Format::Hava => Schema::hava(),
        }
    }

    /// Rebuild a schema from its decoded parts, validating the shape: a
    /// leading primary key, exactly one indexed text key, at most one
    /// sliceable field.
    pub(crate) fn from_parts(
        format: Format,
        fields: Vec<FieldDef>,
    ) -> std::result::Result<Schema, String> {
        match fields.first() {
            Some(f) if f.role == FieldRole::PrimaryKey => {}
            _ => return Err("schema does not start with a primary key".to_string()),
        }
        let text = &fields[1..];
        if text.iter().any(|f| f.role == FieldRole::PrimaryKey) {
            return Err("schema has more than one primary key".to_string());
        }
        let mut keys = text
            .iter()
            .enumerate()
            .filter(|(_, f)| f.role == FieldRole::IndexedTextKey);
        let key_pos = match (keys.next(), keys.next()) {
            (Some((pos, _)), None) => pos,
            _ => return Err("schema must have exactly one indexed text key".to_string()),
        };
        let mut sliceable = text
            .iter()
            .enumerate()
            .filter(|(_, f)| f.role == FieldRole::SliceableText);
        let sliceable_pos = match (sliceable.next(), sliceable.next()) {
            (pos, None) => pos.map(|(i, _)| i),
            _ => return Err("schema has more than one sliceable field".to_string()),
        };
        Ok(Schema {
            format,
            fields,
            key_pos,
            sliceable_pos,
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// All fields, `id` first.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// The fields that carry record values (everything after `id`).
    pub fn text_fields(&self) -> &[FieldDef] {
        &self.fields[1..]
    }

    /// True iff the schema carries a `quality` field; used to pick the
    /// output format when writing records back out.
    pub fn has_quality(&self) -> bool {
        self.text_fields().iter().any(|f| f.name == "quality")
    }

    pub(crate) fn key_pos(&self) -> usize {
        self.key_pos
    }

    pub(crate) fn sliceable_pos(&self) -> Option<usize> {
        self.sliceable_pos
    }
}

/// One sequence record: a 0-based ordinal plus the text-field values of its
/// schema, in schema order. Records are independent copies; they do not
/// alias database storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    index: usize,
    values: Vec<String>,
    schema: Arc<Schema>,
}

impl Record {
    pub(crate) fn new(schema: Arc<Schema>, index: usize, values: Vec<String>) -> Record {
        debug_assert_eq!(values.len(), schema.text_fields().len());
        Record {
            index,
            values,
            schema,
        }
    }

    /// Position of this record in its input stream (insertion order).
    pub fn index(&self) -> usize {
        self.index
    }

    /// The record's name key.
    pub fn name(&self) -> &str {
        &self.values[self.schema.key_pos()]
    }

    /// Value of the named field, if the schema has it.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.schema
            .text_fields()
            .iter()
            .position(|f| f.name == field)
            .map(|pos| self.values[pos].as_str())
    }

    pub fn sequence(&self) -> Option<&str> {
        self.get("sequence")
    }

    pub fn quality(&self) -> Option<&str> {
        self.get("quality")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    /// Sub-range of the sliceable field. `None` if the schema has no
    /// sliceable field or the range falls outside it.
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        let pos = self.schema.sliceable_pos()?;
        self.values[pos].get(range)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Field values in schema order, name key included.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}
