//! FASTA index (`.fai`) parsing.
//!
//! Index files consist of one tab-separated line per sequence in the associated
//! FASTA file:
//!
//! ```text
//! <name>\t<length>\t<byte offset>\t<bases per line>\t<bytes per line>
//! ```
//!
//! For example `chr3\t12345\t9000\t80\t81` describes a 12345-base sequence whose
//! first base sits at byte 9000, wrapped at 80 bases per 81-byte line.

use crate::{Error, Result};
use std::collections::HashMap;
use std::io::BufRead;

const FIELD_NAMES: [&str; 5] = ["name", "length", "offset", "line bases", "line width"];

/// Layout of one sequence within the FASTA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    /// Total sequence length in bases
    pub length: u64,
    /// Byte offset of the first base
    pub offset: u64,
    /// Bases per full line
    pub line_bases: u64,
    /// Bytes per full line, line break included
    pub line_width: u64,
}

impl IndexEntry {
    /// Bytes of line break following each full line.
    pub fn newline_width(&self) -> u64 {
        self.line_width - self.line_bases
    }

    /// Byte offset just past the last base, or `None` if it does not fit in a `u64`.
    pub fn data_end(&self) -> Option<u64> {
        if self.length == 0 {
            return Some(self.offset);
        }
        let breaks = (self.length - 1) / self.line_bases;
        breaks
            .checked_mul(self.newline_width())?
            .checked_add(self.length)?
            .checked_add(self.offset)
    }

    /// Parse a single index line. `line_no` is 1-based and only used for errors.
    pub fn from_line(line: &str, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != FIELD_NAMES.len() {
            return Err(Error::format(
                line_no,
                format!(
                    "expected {} tab-separated fields, got {}: {:?}",
                    FIELD_NAMES.len(),
                    fields.len(),
                    line
                ),
            ));
        }

        let name = fields[0];
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::format(
                line_no,
                format!("invalid sequence name {:?}", name),
            ));
        }

        let number = |i: usize| parse_field(fields[i], FIELD_NAMES[i], line_no);
        let entry = IndexEntry {
            name: name.to_string(),
            length: number(1)?,
            offset: number(2)?,
            line_bases: number(3)?,
            line_width: number(4)?,
        };

        if entry.line_width < entry.line_bases {
            return Err(Error::format(
                line_no,
                format!(
                    "line width ({}) is less than line bases ({}) for {}",
                    entry.line_width, entry.line_bases, entry.name
                ),
            ));
        }
        if entry.length > 0 && entry.line_bases == 0 {
            return Err(Error::format(
                line_no,
                format!("zero line bases for non-empty sequence {}", entry.name),
            ));
        }
        if entry.data_end().is_none() {
            return Err(Error::format(
                line_no,
                format!("byte range of {} overflows a 64-bit offset", entry.name),
            ));
        }

        Ok(entry)
    }
}

fn parse_field(field: &str, what: &str, line_no: usize) -> Result<u64> {
    // `u64::from_str` accepts a leading '+', the index format does not.
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::format(
            line_no,
            format!("invalid {} field: {:?}", what, field),
        ));
    }
    field
        .parse()
        .map_err(|e| Error::format(line_no, format!("invalid {} field {:?}: {}", what, field, e)))
}

/// Parse index text into entries, in file order.
///
/// Blank lines are skipped. Parsing stops at the first malformed line.
pub fn parse_index<R: BufRead>(reader: R) -> Result<Vec<IndexEntry>> {
    let mut entries = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.is_empty() {
            continue;
        }
        entries.push(IndexEntry::from_line(line, i + 1)?);
    }
    Ok(entries)
}

/// Lookup table from sequence name to layout, plus the names in file-offset order.
#[derive(Debug, Clone, Default)]
pub struct IndexCatalog {
    entries: HashMap<String, IndexEntry>,
    names: Vec<String>,
}

impl IndexCatalog {
    /// Build a catalog. A name that appears more than once keeps its last entry.
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        let mut map: HashMap<String, IndexEntry> = HashMap::with_capacity(entries.len());
        let mut names = Vec::with_capacity(entries.len());

        for entry in entries {
            if map.contains_key(&entry.name) {
                tracing::warn!(name = %entry.name, "duplicate sequence name in index, keeping last entry");
            } else {
                names.push(entry.name.clone());
            }
            map.insert(entry.name.clone(), entry);
        }

        // Stable: equal offsets keep first-appearance order.
        names.sort_by_key(|name| map[name].offset);

        Self {
            entries: map,
            names,
        }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Ok(Self::from_entries(parse_index(reader)?))
    }

    pub fn get(&self, name: &str) -> Result<&IndexEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Sequence names ordered by ascending byte offset.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries in the same order as [`IndexCatalog::names`].
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.names.iter().map(|name| &self.entries[name])
    }
}

/// Read an index and return a map of sequence name to length, without
/// touching the FASTA file itself.
pub fn reference_lengths<R: BufRead>(index: R) -> Result<HashMap<String, u64>> {
    let catalog = IndexCatalog::from_reader(index)?;
    Ok(catalog
        .iter()
        .map(|entry| (entry.name.clone(), entry.length))
        .collect())
}
