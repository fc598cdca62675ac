//! The capability interface between the settlement engine and a market.

use partybid_types::{
    Address, AuctionId, MarketKind, MarketSnapshot, PartyBidError, Result, TokenId,
};

use crate::{
    house::{HouseError, SharedHouse},
    nouns::NounsMarket,
    zora::ZoraMarket,
};

/// What the engine may ask of an auction house.
///
/// Implementations hold no state of their own beyond the connection: every
/// query reads the house afresh, and nothing the engine decides is made
/// from a cached snapshot.
pub trait MarketAdapter: Send + Sync {
    fn kind(&self) -> MarketKind;

    /// Current state of `auction_id`.
    fn current_state(&self, auction_id: AuctionId) -> Result<MarketSnapshot>;

    /// Smallest bid the house would accept right now.
    fn minimum_bid(&self, snapshot: &MarketSnapshot) -> u128;

    /// Bid `amount` wei on `auction_id` as the party.
    ///
    /// # Errors
    /// - `MarketPaused` if the house is paused
    /// - `MarketRejected` for any other refusal
    fn place_bid(&self, auction_id: AuctionId, amount: u128) -> Result<()>;

    /// Settle `auction_id`. Succeeds without effect if the house already
    /// settled it.
    ///
    /// # Errors
    /// - `NotYetEndable` if the house refuses because the end time has not
    ///   passed
    /// - `MarketFinalizeFailed` for any other refusal
    fn finalize(&self, auction_id: AuctionId) -> Result<()>;

    /// Current owner of the auctioned asset.
    fn owner_of(&self, token_id: TokenId) -> Result<Address>;
}

/// Build the adapter for `kind`, bidding on `house` as `bidder`.
#[must_use]
pub fn connect(kind: MarketKind, house: SharedHouse, bidder: Address) -> Box<dyn MarketAdapter> {
    match kind {
        MarketKind::Nouns => Box::new(NounsMarket::new(house, bidder)),
        MarketKind::Zora => Box::new(ZoraMarket::new(house, bidder)),
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Map a refusal to a bid.
pub(crate) fn bid_error(err: HouseError) -> PartyBidError {
    match err {
        HouseError::Paused => PartyBidError::MarketPaused,
        other => PartyBidError::MarketRejected {
            reason: other.to_string(),
        },
    }
}

/// Map a refusal to settle. `AlreadySettled` is handled by the caller.
pub(crate) fn finalize_error(err: HouseError) -> PartyBidError {
    match err {
        HouseError::NotEnded { end_time } => PartyBidError::NotYetEndable { end_time },
        other => PartyBidError::MarketFinalizeFailed {
            reason: other.to_string(),
        },
    }
}

/// Map a failed read.
pub(crate) fn read_error(err: HouseError) -> PartyBidError {
    PartyBidError::MarketRejected {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use partybid_types::ManualClock;

    use super::*;
    use crate::house::{HouseRules, ReserveAuctionHouse};

    #[test]
    fn connect_selects_variant() {
        let house =
            ReserveAuctionHouse::new(Arc::new(ManualClock::new(0)), HouseRules::default(), Address::ZERO)
                .shared();
        let party = Address::dummy(1);
        assert_eq!(connect(MarketKind::Nouns, house.clone(), party).kind(), MarketKind::Nouns);
        assert_eq!(connect(MarketKind::Zora, house, party).kind(), MarketKind::Zora);
    }

    #[test]
    fn paused_maps_to_market_paused() {
        assert_eq!(bid_error(HouseError::Paused), PartyBidError::MarketPaused);
        assert!(matches!(
            bid_error(HouseError::Expired),
            PartyBidError::MarketRejected { .. }
        ));
    }

    #[test]
    fn not_ended_keeps_end_time() {
        assert_eq!(
            finalize_error(HouseError::NotEnded { end_time: 42 }),
            PartyBidError::NotYetEndable { end_time: 42 }
        );
        assert!(matches!(
            finalize_error(HouseError::NotPaused),
            PartyBidError::MarketFinalizeFailed { .. }
        ));
    }
}
