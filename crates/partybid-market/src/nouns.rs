//! Nouns-style auction house adapter.
//!
//! The minimum increment percentage is read from the house on every call.
//! Settlement picks the entry point the house's pause state allows:
//! `settle_auction` while paused, `settle_current_and_create_new_auction`
//! otherwise.

use partybid_types::{Address, AuctionId, MarketKind, MarketSnapshot, Result, TokenId};

use crate::{
    adapter::{MarketAdapter, bid_error, finalize_error, read_error},
    house::{HouseError, SharedHouse, lock_house},
};

pub struct NounsMarket {
    house: SharedHouse,
    bidder: Address,
}

impl NounsMarket {
    #[must_use]
    pub fn new(house: SharedHouse, bidder: Address) -> Self {
        Self { house, bidder }
    }
}

impl MarketAdapter for NounsMarket {
    fn kind(&self) -> MarketKind {
        MarketKind::Nouns
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
        let mut house = lock_house(&self.house);
        let settled = if house.paused() {
            house.settle_auction(auction_id)
        } else if house.current_auction() == Some(auction_id) {
            house.settle_current_and_create_new_auction().map(|_| ())
        } else {
            // Whoever started the next auction settled this one on the way.
            match house.snapshot(auction_id) {
                Ok(s) if s.settled => Err(HouseError::AlreadySettled),
                Ok(_) => Err(HouseError::NotCurrent(auction_id)),
                Err(e) => Err(e),
            }
        };
        match settled {
            Ok(()) | Err(HouseError::AlreadySettled) => Ok(()),
            Err(e) => {
                tracing::warn!(auction = %auction_id, error = %e, "Nouns settlement refused");
                Err(finalize_error(e))
            }
        }
    }

    fn owner_of(&self, token_id: TokenId) -> Result<Address> {
        lock_house(&self.house).owner_of(token_id).map_err(read_error)
    }
}
