//! Party events: the append-only audit trail of committed mutations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, FeeSplit, PartyStatus};

/// Something the party committed. Emitted only after the mutation that
/// produced it succeeded in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PartyEvent {
    Contributed {
        contributor: Address,
        amount: u128,
        excess: u128,
        shares: u128,
        total_contributed: u128,
    },
    Bid {
        amount: u128,
    },
    Finalized {
        status: PartyStatus,
        total_spent: u128,
        fees: FeeSplit,
    },
    Redeemed {
        contributor: Address,
        shares: u128,
        amount: u128,
    },
    ExcessClaimed {
        contributor: Address,
        amount: u128,
    },
}

impl PartyEvent {
    /// Event name as emitted on chain.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Contributed { .. } => "Contributed",
            Self::Bid { .. } => "Bid",
            Self::Finalized { .. } => "Finalized",
            Self::Redeemed { .. } => "Redeemed",
            Self::ExcessClaimed { .. } => "ExcessClaimed",
        }
    }
}

impl fmt::Display for PartyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
