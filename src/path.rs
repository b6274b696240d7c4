//! Accessor paths: the colon-delimited address of a value inside a document.
//!
//! `database:hosts:0` addresses the first element of the `hosts` sequence in the
//! `database` mapping. Numeric segments index sequences and may only appear as
//! the final segment, which is why [`AccessorPath`] stores the leading key
//! segments and the leaf separately.

use std::fmt;

use crate::error::DocumentError;

pub const SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = raw.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(raw.to_string())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorPath {
    raw: String,
    pub parents: Vec<String>,
    pub leaf: Segment,
}

impl AccessorPath {
    pub fn parse(raw: &str) -> Result<Self, DocumentError> {
        let mut segments: Vec<Segment> = raw.split(SEPARATOR).map(Segment::parse).collect();
        let total = segments.len();

        // `str::split` always yields at least one item.
        let leaf = segments.pop().unwrap_or(Segment::Key(String::new()));

        let parents = segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| match segment {
                Segment::Key(key) => Ok(key),
                Segment::Index(_) => Err(DocumentError::PathShape {
                    accessor: raw.to_string(),
                    reason: format!(
                        "integer indexes must be the final element in the path (index was element {} in a path with {total} elements)",
                        i + 1
                    ),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            parents,
            leaf,
        })
    }

    /// Number of segments, used to order a batch shallow-to-deep.
    pub fn depth(&self) -> usize {
        self.parents.len() + 1
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for AccessorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Depth of a raw accessor without validating it.
pub fn depth_of(raw: &str) -> usize {
    raw.split(SEPARATOR).count()
}
