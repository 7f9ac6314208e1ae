//! Random access to sequences of an indexed FASTA file.
//!
//! [`IndexedFasta`] performs efficient lookups of arbitrary base ranges using a
//! `.fai` index, without reading the FASTA data into memory. Each lookup
//! translates the base range into a byte range (see [`crate::layout`]), reads
//! it through a single-window cache, and strips the interleaved line breaks.
//!
//! # Example
//!
//! ```no_run
//! use fastaidx::{Fasta, IndexedFasta, Options};
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! # fn main() -> fastaidx::Result<()> {
//! let fasta = File::open("genome.fa")?;
//! let index = BufReader::new(File::open("genome.fa.fai")?);
//! let reader = IndexedFasta::new(fasta, index, Options::default())?;
//!
//! let bases = reader.get("chr1", 1000, 2000)?;
//! assert_eq!(bases.len(), 1000);
//! # Ok(())
//! # }
//! ```

use crate::cache::{DEFAULT_MIN_READ_SIZE, ReadThroughCache};
use crate::encoding::{Encoding, Transform};
use crate::index::{IndexCatalog, IndexEntry};
use crate::layout::translate;
use crate::{Error, Result};
use std::io::{BufRead, Read, Seek};
use std::sync::{Arc, Mutex};

/// Read access to named sequences.
pub trait Fasta {
    /// Sequence names, ordered by their position in the file.
    fn seq_names(&self) -> &[String];

    /// Length of the named sequence in bases.
    fn len(&self, name: &str) -> Result<u64>;

    /// Bases `[start, end)` of the named sequence, 0-based.
    fn get(&self, name: &str, start: u64, end: u64) -> Result<String>;
}

/// Construction options for [`IndexedFasta`].
#[derive(Clone)]
pub struct Options {
    transform: Option<Arc<dyn Transform>>,
    min_read_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            transform: None,
            min_read_size: DEFAULT_MIN_READ_SIZE,
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("transform", &self.transform.is_some())
            .field("min_read_size", &self.min_read_size)
            .finish()
    }
}

impl Options {
    pub fn with_encoding(self, encoding: Encoding) -> Self {
        match encoding {
            Encoding::Raw => Self {
                transform: None,
                ..self
            },
            other => self.with_transform(other),
        }
    }

    /// Run `transform` over every extracted sequence. Replaces any encoding.
    pub fn with_transform<T: Transform + 'static>(self, transform: T) -> Self {
        Self {
            transform: Some(Arc::new(transform)),
            ..self
        }
    }

    /// Minimum number of bytes fetched from the source on a cache miss.
    pub fn with_min_read_size(self, min_read_size: usize) -> Self {
        Self {
            min_read_size,
            ..self
        }
    }
}

/// Cache and scratch buffer, only ever touched under the lock.
struct Reader<R> {
    cache: ReadThroughCache<R>,
    scratch: Vec<u8>,
}

/// A FASTA file accessed through its index.
///
/// `R` is the byte source. Pass `&mut File` (or `&File`) to lend a handle the
/// caller keeps; the reader never closes it. All lookups share one cache and
/// are serialized by an internal lock, so an `IndexedFasta` can be shared
/// between threads when `R: Send`.
pub struct IndexedFasta<R> {
    catalog: IndexCatalog,
    transform: Option<Arc<dyn Transform>>,
    reader: Mutex<Option<Reader<R>>>,
}

impl<R: Read + Seek> IndexedFasta<R> {
    /// Parse `index` and attach `source` for sequence lookups.
    ///
    /// Callers that expect to read most of the file are better served by a
    /// streaming parser.
    pub fn new<I: BufRead>(source: R, index: I, options: Options) -> Result<Self> {
        let catalog = IndexCatalog::from_reader(index)?;
        Ok(Self::from_catalog(Some(source), catalog, options))
    }

    /// Build a reader from an already parsed catalog.
    pub fn from_catalog(source: Option<R>, catalog: IndexCatalog, options: Options) -> Self {
        tracing::debug!(
            sequences = catalog.len(),
            has_source = source.is_some(),
            "opened indexed FASTA"
        );
        let reader = source.map(|source| Reader {
            cache: ReadThroughCache::with_min_read_size(source, options.min_read_size),
            scratch: Vec::new(),
        });
        Self {
            catalog,
            transform: options.transform,
            reader: Mutex::new(reader),
        }
    }

    /// Layout of the named sequence.
    pub fn entry(&self, name: &str) -> Result<&IndexEntry> {
        self.catalog.get(name)
    }

    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    /// Like [`Fasta::get`], without requiring the bases to be valid UTF-8.
    pub fn get_bytes(&self, name: &str, start: u64, end: u64) -> Result<Vec<u8>> {
        self.with_bases(name, start, end, <[u8]>::to_vec)
    }

    /// Extract `[start, end)` into the scratch buffer and hand it to `f` while
    /// the lock is held.
    fn with_bases<T>(
        &self,
        name: &str,
        start: u64,
        end: u64,
        f: impl FnOnce(&[u8]) -> T,
    ) -> Result<T> {
        let entry = self.catalog.get(name)?;
        let span = translate(entry, start, end)?;

        let mut guard = self
            .reader
            .lock()
            .map_err(|_| Error::Internal("FASTA reader lock poisoned".to_string()))?;
        let Reader { cache, scratch } = guard.as_mut().ok_or(Error::NoSource)?;

        let raw = cache.read(span.offset, span_len(span.len)?)?;
        strip_line_breaks(raw, span.line_pos, entry, scratch);
        debug_assert_eq!(scratch.len() as u64, end - start);

        if let Some(transform) = &self.transform {
            transform.apply(scratch);
        }
        Ok(f(scratch))
    }
}

impl IndexedFasta<std::io::Empty> {
    /// Reader over index metadata only. [`Fasta::get`] fails with
    /// [`Error::NoSource`].
    pub fn from_index<I: BufRead>(index: I) -> Result<Self> {
        let catalog = IndexCatalog::from_reader(index)?;
        Ok(Self::from_catalog(None, catalog, Options::default()))
    }
}

impl<R: Read + Seek> Fasta for IndexedFasta<R> {
    fn seq_names(&self) -> &[String] {
        self.catalog.names()
    }

    fn len(&self, name: &str) -> Result<u64> {
        Ok(self.catalog.get(name)?.length)
    }

    fn get(&self, name: &str, start: u64, end: u64) -> Result<String> {
        self.with_bases(name, start, end, |bases| {
            std::str::from_utf8(bases).map(str::to_owned).map_err(|e| {
                Error::InvalidData(format!("{}:{}-{} is not UTF-8: {}", name, start, end, e))
            })
        })?
    }
}

fn span_len(len: u64) -> Result<usize> {
    usize::try_from(len).map_err(|_| {
        Error::InvalidData(format!("span of {} bytes does not fit in memory", len))
    })
}

/// Copy the data bytes of `raw` into `out`, dropping line breaks.
///
/// `line_pos` is the position of `raw[0]` within its line; positions below
/// `line_bases` are data, the rest up to `line_width` are line break bytes.
fn strip_line_breaks(raw: &[u8], line_pos: u64, entry: &IndexEntry, out: &mut Vec<u8>) {
    let line_bases = entry.line_bases as usize;
    let line_width = entry.line_width as usize;

    out.clear();
    let mut pos = line_pos as usize;
    let mut rest = raw;
    while !rest.is_empty() {
        let n = if pos < line_bases {
            let n = (line_bases - pos).min(rest.len());
            out.extend_from_slice(&rest[..n]);
            n
        } else {
            (line_width - pos).min(rest.len())
        };
        rest = &rest[n..];
        pos += n;
        if pos == line_width {
            pos = 0;
        }
    }
}
