//! Filter rule definitions.

use serde::Serialize;

use crate::{Action, Column, Relation};

/// One filter entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Session-local identifier
    pub id: u32,
    /// Event attribute the rule compares
    pub column: Column,
    /// Comparison operator
    pub relation: Relation,
    /// Include or exclude matching events
    pub action: Action,
    /// Comparison value as stored, including the trailing NUL
    pub value: String,
}

impl Rule {
    /// Create a rule from already-resolved parts.
    pub fn new(
        id: u32,
        column: Column,
        relation: Relation,
        action: Action,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id,
            column,
            relation,
            action,
            value: value.into(),
        }
    }

    /// Identity used for duplicate detection; the id is ignored.
    pub fn key(&self) -> (Column, Relation, Action, &str) {
        (self.column, self.relation, self.action, self.value.as_str())
    }

    /// Value with NUL characters removed.
    pub fn display_value(&self) -> String {
        self.value.replace('\0', "")
    }

    /// Project to display names.
    pub fn to_listed(&self) -> ListedRule {
        ListedRule {
            id: self.id,
            column: self.column.to_string(),
            relation: self.relation.as_str().to_string(),
            value: self.display_value(),
            action: self.action.as_str().to_string(),
        }
    }
}

/// A rule projected to display names, as returned by listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedRule {
    pub id: u32,
    pub column: String,
    pub relation: String,
    pub value: String,
    pub action: String,
}

impl ListedRule {
    /// Borrow as an `(id, column, relation, value, action)` tuple.
    pub fn as_tuple(&self) -> (u32, &str, &str, &str, &str) {
        (
            self.id,
            &self.column,
            &self.relation,
            &self.value,
            &self.action,
        )
    }
}
