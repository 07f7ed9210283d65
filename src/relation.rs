//! Relation (comparison operator) definitions.

use std::fmt;

/// Relation compares an event column against the rule value.
///
/// The discriminant is the index stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Relation {
    Is = 0,
    IsNot = 1,
    LessThan = 2,
    MoreThan = 3,
    BeginsWith = 4,
    EndsWith = 5,
    Contains = 6,
    Excludes = 7,
}

impl Relation {
    /// All relations in on-disk index order.
    pub const ALL: [Relation; 8] = [
        Relation::Is,
        Relation::IsNot,
        Relation::LessThan,
        Relation::MoreThan,
        Relation::BeginsWith,
        Relation::EndsWith,
        Relation::Contains,
        Relation::Excludes,
    ];

    /// Parse a relation from its display name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Is => "is",
            Relation::IsNot => "is not",
            Relation::LessThan => "less than",
            Relation::MoreThan => "more than",
            Relation::BeginsWith => "begins with",
            Relation::EndsWith => "ends with",
            Relation::Contains => "contains",
            Relation::Excludes => "excludes",
        }
    }

    /// Convert to the on-disk index.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Convert from the on-disk index.
    pub fn from_index(v: u32) -> Option<Self> {
        Self::ALL.get(v as usize).copied()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Relation {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::parse(s).ok_or_else(|| crate::Error::UnknownRelation(s.to_string()))
    }
}
