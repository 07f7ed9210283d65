//! Filter action types.

use std::fmt;

/// Action represents what happens to an event matching a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    /// Drop matching events from the display
    Exclude = 0,
    /// Show matching events
    Include = 1,
}

impl Action {
    /// All actions in on-disk index order.
    pub const ALL: [Action; 2] = [Action::Exclude, Action::Include];

    /// Parse an action from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "EXCLUDE" => Some(Action::Exclude),
            "INCLUDE" => Some(Action::Include),
            _ => None,
        }
    }

    /// Convert from a u8 value.
    ///
    /// Returns `None` for invalid values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Action::Exclude),
            1 => Some(Action::Include),
            _ => None,
        }
    }

    /// Convert to a u8 value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Exclude => "EXCLUDE",
            Action::Include => "INCLUDE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::parse(s).ok_or_else(|| crate::Error::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!(Action::parse("INCLUDE"), Some(Action::Include));
        assert_eq!(Action::parse("include"), Some(Action::Include));
        assert_eq!(Action::parse("Exclude"), Some(Action::Exclude));
        assert_eq!(Action::parse("DROP"), None);
        assert!("ignore".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_from_u8() {
        assert_eq!(Action::from_u8(0), Some(Action::Exclude));
        assert_eq!(Action::from_u8(1), Some(Action::Include));
        assert_eq!(Action::from_u8(2), None);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Exclude.to_string(), "EXCLUDE");
        assert_eq!(Action::Include.to_string(), "INCLUDE");
    }
}
