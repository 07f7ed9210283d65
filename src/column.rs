//! Monitored event columns.
//!
//! Columns are stored on disk as the 32-bit identifiers Process Monitor
//! assigns them. Codes missing from [`COLUMNS`] are kept as-is so a file
//! written by a newer tool still loads and saves unchanged.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::fmt;

/// Known column codes and their display names.
pub static COLUMNS: &[(u32, &str)] = &[
    (0x9c98, "Architecture"),
    (0x9c93, "Authentication ID"),
    (0x9c96, "Category"),
    (0x9c82, "CommandLine"),
    (0x9c80, "Company"),
    (0x9c74, "Date & Time"),
    (0x9c81, "Description"),
    (0x9c79, "Detail"),
    (0x9c8d, "Duration"),
    (0x9c92, "Event Class"),
    (0x9c84, "Image Path"),
    (0x9c95, "Integrity"),
    (0x9c77, "Operation"),
    (0x9c97, "Parent PID"),
    (0x9c87, "Path"),
    (0x9c76, "PID"),
    (0x9c75, "Process Name"),
    (0x9c8c, "Relative Time"),
    (0x9c78, "Result"),
    (0x9c7a, "Sequence"),
    (0x9c85, "Session"),
    (0x9c88, "TID"),
    (0x9c8e, "Time Of Day"),
    (0x9c83, "User"),
    (0x9c91, "Version"),
    (0x9c94, "Virtualized"),
];

static BY_CODE: Lazy<AHashMap<u32, &'static str>> =
    Lazy::new(|| COLUMNS.iter().copied().collect());

static BY_NAME: Lazy<AHashMap<String, u32>> = Lazy::new(|| {
    COLUMNS
        .iter()
        .map(|(code, name)| (normalize(name), *code))
        .collect()
});

/// Lowercase and drop whitespace, so "Command Line" finds "CommandLine".
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A monitored event attribute, identified by its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column(u32);

impl Column {
    /// Wrap a raw column code. Unknown codes are allowed.
    pub fn from_code(code: u32) -> Self {
        Self(code)
    }

    /// Look up a column by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(&normalize(name)).copied().map(Self)
    }

    /// The on-disk code.
    pub fn code(self) -> u32 {
        self.0
    }

    /// Display name, if the code is in the column table.
    pub fn name(self) -> Option<&'static str> {
        BY_CODE.get(&self.0).copied()
    }

    /// Whether the code is in the column table.
    pub fn is_known(self) -> bool {
        self.name().is_some()
    }

    /// Iterate over all known columns in table order.
    pub fn known() -> impl Iterator<Item = Column> {
        COLUMNS.iter().map(|(code, _)| Column(*code))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:04x}", self.0),
        }
    }
}

impl std::str::FromStr for Column {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::from_name(s).ok_or_else(|| crate::Error::UnknownColumn(s.to_string()))
    }
}
