//! Translation of base coordinates into byte ranges of a line-wrapped file.

use crate::index::IndexEntry;
use crate::{Error, Result};

/// Bytes to read for a base range, and where that read starts within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalSpan {
    /// Absolute byte offset of the first requested base
    pub offset: u64,
    /// Bytes to read, interleaved line breaks included
    pub len: u64,
    /// Position of `offset` within its line, in `[0, line_width)`
    pub line_pos: u64,
}

impl PhysicalSpan {
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// Compute the physical span covering bases `[start, end)` of `entry`.
pub fn translate(entry: &IndexEntry, start: u64, end: u64) -> Result<PhysicalSpan> {
    if start >= end {
        return Err(Error::InvalidRange { start, end });
    }
    if end > entry.length {
        return Err(Error::OutOfBounds {
            name: entry.name.clone(),
            end,
            length: entry.length,
        });
    }

    let overflow = || {
        Error::InvalidData(format!(
            "byte offset of {}:{}-{} overflows a 64-bit offset",
            entry.name, start, end
        ))
    };

    let newline_width = entry.newline_width();
    let relative = (start / entry.line_bases)
        .checked_mul(newline_width)
        .and_then(|breaks| breaks.checked_add(start))
        .ok_or_else(overflow)?;

    // Line breaks strictly inside the range. A range ending on the last base
    // of a line does not pull in that line's break.
    let bases = end - start;
    let first_line_bases = entry.line_bases - start % entry.line_bases;
    let newlines = if bases > first_line_bases {
        1 + (bases - first_line_bases - 1) / entry.line_bases
    } else {
        0
    };
    let len = newlines
        .checked_mul(newline_width)
        .and_then(|breaks| breaks.checked_add(bases))
        .ok_or_else(overflow)?;

    // The whole span, not just its start, must be addressable.
    let offset = entry.offset.checked_add(relative).ok_or_else(overflow)?;
    offset.checked_add(len).ok_or_else(overflow)?;

    Ok(PhysicalSpan {
        offset,
        len,
        line_pos: relative % entry.line_width,
    })
}
