//! Zora reserve auction house adapter.

use partybid_types::{Address, AuctionId, MarketKind, MarketSnapshot, Result, TokenId};

use crate::{
    adapter::{MarketAdapter, bid_error, finalize_error, read_error},
    house::{HouseError, SharedHouse, lock_house},
};

/// Bids at the house's increment and settles through `end_auction`, which
/// ignores the house's pause switch.
pub struct ZoraMarket {
    house: SharedHouse,
    bidder: Address,
}

impl ZoraMarket {
    #[must_use]
    pub fn new(house: SharedHouse, bidder: Address) -> Self {
        Self { house, bidder }
    }
}

impl MarketAdapter for ZoraMarket {
    fn kind(&self) -> MarketKind {
        MarketKind::Zora
    }

    fn current_state(&self, auction_id: AuctionId) -> Result<MarketSnapshot> {
        lock_house(&self.house).snapshot(auction_id).map_err(read_error)
    }

    fn minimum_bid(&self, snapshot: &MarketSnapshot) -> u128 {
        if snapshot.highest_bid == 0 {
            return snapshot.reserve_price;
        }
        let pct = u128::from(lock_house(&self.house).rules().min_bid_increment_percentage);
        snapshot
            .highest_bid
            .saturating_add(snapshot.highest_bid.saturating_mul(pct) / 100)
    }

    fn place_bid(&self, auction_id: AuctionId, amount: u128) -> Result<()> {
        lock_house(&self.house)
            .create_bid(self.bidder, auction_id, amount)
            .map_err(bid_error)
    }

    fn finalize(&self, auction_id: AuctionId) -> Result<()> {
        match lock_house(&self.house).end_auction(auction_id) {
            Ok(()) | Err(HouseError::AlreadySettled) => Ok(()),
            Err(e) => {
                tracing::warn!(auction = %auction_id, error = %e, "Zora end_auction refused");
                Err(finalize_error(e))
            }
        }
    }

    fn owner_of(&self, token_id: TokenId) -> Result<Address> {
        lock_house(&self.house).owner_of(token_id).map_err(read_error)
    }
}
