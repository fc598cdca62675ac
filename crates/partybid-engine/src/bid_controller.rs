//! Minimal-bid policy.
//!
//! The party never overbids: each attempt reads a fresh snapshot and places
//! exactly the smallest bid the house would accept, or nothing at all if the
//! party already leads.

use partybid_market::MarketAdapter;
use partybid_types::{Address, AuctionId, PartyBidError, Result};
use serde::{Deserialize, Serialize};

/// Result of one bid attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BidOutcome {
    /// A bid of `amount` wei was accepted by the house.
    Placed { amount: u128 },
    /// The party already holds the highest bid; nothing was sent.
    AlreadyLeading,
}

/// Places bids on behalf of one party in one auction.
pub struct BidController<'a> {
    market: &'a dyn MarketAdapter,
    auction_id: AuctionId,
    party: Address,
    reserve_price: u128,
}

impl<'a> BidController<'a> {
    #[must_use]
    pub fn new(
        market: &'a dyn MarketAdapter,
        auction_id: AuctionId,
        party: Address,
        reserve_price: u128,
    ) -> Self {
        Self {
            market,
            auction_id,
            party,
            reserve_price,
        }
    }

    /// Smallest bid that would take the lead right now: the house minimum,
    /// raised to the party's own reserve if that is higher.
    pub fn minimum_valid_bid(&self) -> Result<u128> {
        let snapshot = self.market.current_state(self.auction_id)?;
        Ok(self.market.minimum_bid(&snapshot).max(self.reserve_price))
    }

    /// Bid the minimum if the party is not already leading.
    ///
    /// # Errors
    /// - `MarketPaused` if the house is paused
    /// - `InsufficientFunds` if `available_funds` is below the minimum
    /// - `MarketRejected` if the house refuses the bid
    pub fn attempt_bid(&self, available_funds: u128) -> Result<BidOutcome> {
        let snapshot = self.market.current_state(self.auction_id)?;
        tracing::debug!(
            auction = %snapshot.auction_id,
            highest_bid = snapshot.highest_bid,
            end_time = snapshot.end_time,
            paused = snapshot.paused,
            "Read market before bidding"
        );

        if snapshot.is_leading(self.party) {
            return Ok(BidOutcome::AlreadyLeading);
        }
        if snapshot.paused {
            return Err(PartyBidError::MarketPaused);
        }

        let amount = self.market.minimum_bid(&snapshot).max(self.reserve_price);
        if amount > available_funds {
            return Err(PartyBidError::InsufficientFunds {
                needed: amount,
                available: available_funds,
            });
        }

        if let Err(e) = self.market.place_bid(self.auction_id, amount) {
            tracing::warn!(auction = %self.auction_id, amount, error = %e, "Bid rejected");
            return Err(e);
        }
        Ok(BidOutcome::Placed { amount })
    }
}
