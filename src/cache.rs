use crate::{Error, Result};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Default minimum number of bytes fetched per refill.
pub const DEFAULT_MIN_READ_SIZE: usize = 8192;

/// Single-window read-through cache over a seekable byte source.
///
/// Holds one contiguous window of the source. Requests that fall inside the
/// window are served from memory; anything else seeks and refills it.
#[derive(Debug)]
pub struct ReadThroughCache<R> {
    source: R,
    window_start: u64,
    window: Vec<u8>,
    min_read_size: usize,
}

impl<R: Read + Seek> ReadThroughCache<R> {
    pub fn new(source: R) -> Self {
        Self::with_min_read_size(source, DEFAULT_MIN_READ_SIZE)
    }

    pub fn with_min_read_size(source: R, min_read_size: usize) -> Self {
        Self {
            source,
            window_start: 0,
            window: Vec::new(),
            min_read_size: min_read_size.max(1),
        }
    }

    /// Current window as `(start offset, length)`.
    pub fn window(&self) -> (u64, usize) {
        (self.window_start, self.window.len())
    }

    fn contains(&self, offset: u64, end: u64) -> bool {
        match self.window_start.checked_add(self.window.len() as u64) {
            Some(window_end) => offset >= self.window_start && end <= window_end,
            None => false,
        }
    }

    /// Return exactly `len` bytes starting at `offset`.
    pub fn read(&mut self, offset: u64, len: usize) -> Result<&[u8]> {
        let end = offset.checked_add(len as u64).ok_or_else(|| {
            Error::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("read of {} bytes at offset {} overflows", len, offset),
            ))
        })?;
        if !self.contains(offset, end) {
            self.refill(offset, len)?;
        } else {
            tracing::trace!(offset, len, "cache hit");
        }
        let start = (offset - self.window_start) as usize;
        Ok(&self.window[start..start + len])
    }

    fn refill(&mut self, offset: u64, len: usize) -> Result<()> {
        let position = self.source.seek(SeekFrom::Start(offset))?;
        if position != offset {
            self.window.clear();
            return Err(Error::Io(std::io::Error::other(format!(
                "failed to seek to offset {}: landed at {}",
                offset, position
            ))));
        }

        let size = len.max(self.min_read_size);
        tracing::debug!(offset, len, size, "refilling read cache");

        // Grows the allocation when needed, never shrinks it.
        self.window.clear();
        self.window.resize(size, 0);
        let filled = match read_full(&mut self.source, &mut self.window) {
            Ok(n) => n,
            Err(e) => {
                self.window.clear();
                return Err(e.into());
            }
        };
        self.window.truncate(filled);
        self.window_start = offset;

        if filled < len {
            return Err(Error::UnexpectedEof {
                offset,
                wanted: len,
                got: filled,
            });
        }
        Ok(())
    }
}

/// Read until `buf` is full or the source is exhausted.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
