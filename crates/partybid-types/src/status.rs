//! Party lifecycle status.
//!
//! ```text
//!   ┌────────┐  finalize: party owns asset   ┌─────┐
//!   │ ACTIVE ├──────────────────────────────▶│ WON │
//!   └───┬────┘                               └─────┘
//!       │ finalize: someone else owns it
//!       ▼
//!   ┌──────┐
//!   │ LOST │
//!   └──────┘
//! ```
//!
//! Transitions are **monotonic**: WON and LOST are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The lifecycle state of a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyStatus {
    /// Accepting contributions and bids.
    #[default]
    Active,
    /// The party owns the asset after finalize.
    Won,
    /// The auction settled to someone else.
    Lost,
}

impl PartyStatus {
    /// Can the party move from this status to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Active, Self::Won | Self::Lost))
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for PartyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Won => write!(f, "WON"),
            Self::Lost => write!(f, "LOST"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_valid() {
        assert!(PartyStatus::Active.can_transition_to(PartyStatus::Won));
        assert!(PartyStatus::Active.can_transition_to(PartyStatus::Lost));
    }

    #[test]
    fn terminal_states_never_move() {
        for terminal in [PartyStatus::Won, PartyStatus::Lost] {
            for target in [PartyStatus::Active, PartyStatus::Won, PartyStatus::Lost] {
                assert!(!terminal.can_transition_to(target), "{terminal} -> {target}");
            }
        }
    }

    #[test]
    fn default_is_active() {
        assert_eq!(PartyStatus::default(), PartyStatus::Active);
        assert!(PartyStatus::Active.is_active());
        assert!(PartyStatus::Won.is_finalized());
    }

    #[test]
    fn serde_uses_upper_case() {
        let json = serde_json::to_string(&PartyStatus::Lost).unwrap();
        assert_eq!(json, "\"LOST\"");
    }
}
