use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A region of a named sequence, stored 0-based half-open.
///
/// Parsed from and displayed as samtools-style `name[:beg[-end]]`, which is
/// 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl Region {
    pub fn whole(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            end: None,
        }
    }

    /// Concrete `[start, end)` bounds for a sequence of `length` bases.
    /// An open end extends to the sequence length.
    pub fn resolve(&self, length: u64) -> (u64, u64) {
        let start = self.start.unwrap_or(0);
        let end = self.end.unwrap_or(length);
        (start, end)
    }
}

fn parse_position(s: &str) -> Option<u64> {
    let digits: String = s.chars().filter(|&c| c != ',').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parse `beg` or `beg-end` into 0-based half-open bounds.
fn parse_interval(s: &str) -> Option<(u64, Option<u64>)> {
    let (beg, end) = match s.split_once('-') {
        Some((beg, end)) => (beg, Some(end)),
        None => (s, None),
    };
    let beg = parse_position(beg)?;
    if beg == 0 {
        return None;
    }
    let end = match end {
        Some(end) => Some(parse_position(end)?),
        None => None,
    };
    Some((beg - 1, end))
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidRegion("empty region".to_string()));
        }

        // Names may themselves contain ':'; only treat the last suffix as
        // coordinates when it parses as such.
        if let Some((name, interval)) = s.rsplit_once(':') {
            if let Some((start, end)) = parse_interval(interval) {
                if name.is_empty() {
                    return Err(Error::InvalidRegion(format!("missing name in {:?}", s)));
                }
                if end.is_some_and(|end| end <= start) {
                    return Err(Error::InvalidRegion(format!(
                        "end precedes start in {:?}",
                        s
                    )));
                }
                return Ok(Self {
                    name: name.to_string(),
                    start: Some(start),
                    end,
                });
            }
        }

        Ok(Self::whole(s))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match (self.start, self.end) {
            (None, None) => Ok(()),
            (start, None) => write!(f, ":{}", start.unwrap_or(0) + 1),
            (start, Some(end)) => write!(f, ":{}-{}", start.unwrap_or(0) + 1, end),
        }
    }
}

/// Name and length of one indexed sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceInfo {
    pub name: String,
    pub length: u64,
}
