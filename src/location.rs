//! Physical source locations attached to graph nodes
//!
//! Format: `<path>:<start_line>:<start_column>-<end_line>:<end_column>`
//!
//! Examples:
//! - `src/main.cpp:3:5-3:19`
//! - `include/util.h:10:1-14:2`

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A span inside one file. Lines and columns are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Region {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

/// Where a node came from: the file path plus the region within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicalLocation {
    /// File path as handed to the frontend
    pub path: String,
    pub region: Region,
}

impl PhysicalLocation {
    pub fn new(path: impl Into<String>, region: Region) -> Self {
        Self {
            path: path.into(),
            region,
        }
    }

    /// Parse a location string
    ///
    /// Expected format: `<path>:<start_line>:<start_column>-<end_line>:<end_column>`.
    /// The path itself may contain `:` (e.g. Windows drive letters).
    pub fn parse(text: &str) -> Result<Self> {
        let (head, end) = text
            .rsplit_once('-')
            .ok_or_else(|| Error::InvalidLocation(format!("missing '-' in {}", text)))?;

        let (end_line, end_column) = end
            .split_once(':')
            .ok_or_else(|| Error::InvalidLocation(format!("missing end column in {}", text)))?;

        let (rest, start_column) = head
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidLocation(format!("missing start column in {}", text)))?;

        let (path, start_line) = rest
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidLocation(format!("missing start line in {}", text)))?;

        if path.is_empty() {
            return Err(Error::InvalidLocation(format!("empty path in {}", text)));
        }

        let number = |s: &str| -> Result<u32> {
            s.parse()
                .map_err(|_| Error::InvalidLocation(format!("invalid number '{}' in {}", s, text)))
        };

        Ok(Self {
            path: path.to_string(),
            region: Region::new(
                number(start_line)?,
                number(start_column)?,
                number(end_line)?,
                number(end_column)?,
            ),
        })
    }

    pub fn to_location_string(&self) -> String {
        format!(
            "{}:{}:{}-{}:{}",
            self.path,
            self.region.start_line,
            self.region.start_column,
            self.region.end_line,
            self.region.end_column
        )
    }
}

impl fmt::Display for PhysicalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_location_string())
    }
}

impl FromStr for PhysicalLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for PhysicalLocation {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_location_string())
    }
}

impl<'de> Deserialize<'de> for PhysicalLocation {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PhysicalLocation::parse(&s).map_err(serde::de::Error::custom)
    }
}
