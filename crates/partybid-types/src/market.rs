//! Read-only view of the external auction market.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, AuctionId, TokenId};

/// Which auction house a party bids on. Selected at party creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    /// Nouns-style house: percentage increment read from the house,
    /// pause-aware settlement entry points.
    Nouns,
    /// Zora-style reserve auction house: percentage increment read from the
    /// house, explicit `end_auction` settlement.
    Zora,
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nouns => write!(f, "NOUNS"),
            Self::Zora => write!(f, "ZORA"),
        }
    }
}

/// Snapshot of one auction's state. Never cached across calls: every
/// bidding or finalize decision fetches a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub auction_id: AuctionId,
    pub token_id: TokenId,
    /// Current highest bid in wei; zero when nobody has bid.
    pub highest_bid: u128,
    pub highest_bidder: Option<Address>,
    /// Seconds since the UNIX epoch after which the auction may settle.
    pub end_time: u64,
    pub paused: bool,
    /// Minimum first bid.
    pub reserve_price: u128,
    /// Whether the house already settled this auction.
    pub settled: bool,
}

impl MarketSnapshot {
    /// Whether `who` currently holds the highest bid.
    #[must_use]
    pub fn is_leading(&self, who: Address) -> bool {
        self.highest_bidder == Some(who)
    }

    /// Whether the auction's end time has passed at `now`.
    #[must_use]
    pub fn has_ended(&self, now: u64) -> bool {
        now >= self.end_time
    }
}
