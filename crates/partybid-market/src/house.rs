//! In-process reserve auction house.
//!
//! Models the external market a party bids on: a reserve price for the
//! first bid, a percentage increment for every later bid, a time buffer
//! that extends the auction when a bid lands near the end, and a pause
//! switch. Two settlement entry points mirror the Nouns house:
//! `settle_auction` works only while paused,
//! `settle_current_and_create_new_auction` only while unpaused. Zora-style
//! callers use `end_auction`, which ignores the pause switch.
//!
//! Outbid bidders are refunded immediately; refunds accumulate per account.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use partybid_types::{Address, AuctionId, Clock, MarketSnapshot, TokenId, constants};
use thiserror::Error;

/// Revert reasons of the house.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HouseError {
    #[error("auction {0} does not exist")]
    UnknownAuction(AuctionId),
    #[error("token {0} does not exist")]
    UnknownToken(TokenId),
    #[error("auction house is paused")]
    Paused,
    #[error("auction house is not paused")]
    NotPaused,
    #[error("auction has already been settled")]
    AlreadySettled,
    #[error("auction expired")]
    Expired,
    #[error("must send at least reservePrice {reserve}")]
    BelowReserve { reserve: u128 },
    #[error("must send more than last bid by minBidIncrementPercentage amount (minimum {minimum})")]
    IncrementTooLow { minimum: u128 },
    #[error("auction hasn't completed (ends at {end_time})")]
    NotEnded { end_time: u64 },
    #[error("{0} is not the current auction")]
    NotCurrent(AuctionId),
}

/// House-wide parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseRules {
    pub reserve_price: u128,
    pub min_bid_increment_percentage: u8,
    /// Bids placed with less than this many seconds left extend the end.
    pub time_buffer: u64,
    pub duration: u64,
}

impl Default for HouseRules {
    fn default() -> Self {
        Self {
            reserve_price: 1,
            min_bid_increment_percentage: constants::DEFAULT_MIN_BID_INCREMENT_PERCENTAGE,
            time_buffer: constants::DEFAULT_TIME_BUFFER_SECS,
            duration: constants::DEFAULT_AUCTION_DURATION_SECS,
        }
    }
}

#[derive(Debug, Clone)]
struct Auction {
    token_id: TokenId,
    amount: u128,
    bidder: Option<Address>,
    end_time: u64,
    settled: bool,
}

/// A house shared between adapters and whoever else bids on it.
pub type SharedHouse = Arc<Mutex<ReserveAuctionHouse>>;

/// Lock a shared house. A panic in another holder does not corrupt the
/// house's plain-data state, so poisoning is ignored.
pub fn lock_house(house: &SharedHouse) -> MutexGuard<'_, ReserveAuctionHouse> {
    house.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The auction house itself.
pub struct ReserveAuctionHouse {
    clock: Arc<dyn Clock>,
    rules: HouseRules,
    /// Holds tokens in escrow and keeps unsold ones.
    treasury: Address,
    auctions: BTreeMap<AuctionId, Auction>,
    owners: BTreeMap<TokenId, Address>,
    refunds: BTreeMap<Address, u128>,
    current: Option<AuctionId>,
    next_auction_id: u64,
    paused: bool,
    proceeds: u128,
}

impl ReserveAuctionHouse {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, rules: HouseRules, treasury: Address) -> Self {
        Self {
            clock,
            rules,
            treasury,
            auctions: BTreeMap::new(),
            owners: BTreeMap::new(),
            refunds: BTreeMap::new(),
            current: None,
            next_auction_id: 1,
            paused: false,
            proceeds: 0,
        }
    }

    /// Wrap for sharing.
    #[must_use]
    pub fn shared(self) -> SharedHouse {
        Arc::new(Mutex::new(self))
    }

    /// Put `token_id` up for auction, starting now. The token is held by
    /// the treasury until settlement.
    pub fn create_auction(&mut self, token_id: TokenId) -> AuctionId {
        let id = AuctionId(self.next_auction_id);
        self.next_auction_id += 1;
        let end_time = self.clock.now() + self.rules.duration;
        self.owners.insert(token_id, self.treasury);
        self.auctions.insert(
            id,
            Auction {
                token_id,
                amount: 0,
                bidder: None,
                end_time,
                settled: false,
            },
        );
        self.current = Some(id);
        tracing::debug!(auction = %id, token = %token_id, end_time, "Auction created");
        id
    }

    /// Bid `value` wei on behalf of `bidder`.
    pub fn create_bid(
        &mut self,
        bidder: Address,
        auction_id: AuctionId,
        value: u128,
    ) -> Result<(), HouseError> {
        if self.paused {
            return Err(HouseError::Paused);
        }
        let now = self.clock.now();
        let rules = self.rules;
        let auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(HouseError::UnknownAuction(auction_id))?;
        if auction.settled {
            return Err(HouseError::AlreadySettled);
        }
        if now >= auction.end_time {
            return Err(HouseError::Expired);
        }
        if value < rules.reserve_price {
            return Err(HouseError::BelowReserve {
                reserve: rules.reserve_price,
            });
        }
        let minimum = auction.amount
            + auction.amount * u128::from(rules.min_bid_increment_percentage) / 100;
        if auction.amount > 0 && value < minimum {
            return Err(HouseError::IncrementTooLow { minimum });
        }

        if let Some(previous) = auction.bidder {
            *self.refunds.entry(previous).or_default() += auction.amount;
        }
        auction.amount = value;
        auction.bidder = Some(bidder);
        if auction.end_time - now < rules.time_buffer {
            auction.end_time = now + rules.time_buffer;
        }
        tracing::debug!(auction = %auction_id, bidder = %bidder, value, "Bid accepted");
        Ok(())
    }

    /// Settle while paused.
    pub fn settle_auction(&mut self, auction_id: AuctionId) -> Result<(), HouseError> {
        if !self.paused {
            return Err(HouseError::NotPaused);
        }
        self.settle(auction_id)
    }

    /// Settle the current auction and immediately start the next token.
    pub fn settle_current_and_create_new_auction(&mut self) -> Result<AuctionId, HouseError> {
        if self.paused {
            return Err(HouseError::Paused);
        }
        let current = self.current.ok_or(HouseError::UnknownAuction(AuctionId(0)))?;
        self.settle(current)?;
        let next_token = self
            .owners
            .keys()
            .next_back()
            .map_or(TokenId(0), |t| TokenId(t.0 + 1));
        Ok(self.create_auction(next_token))
    }

    /// Zora-style settlement; the pause switch does not apply.
    pub fn end_auction(&mut self, auction_id: AuctionId) -> Result<(), HouseError> {
        self.settle(auction_id)
    }

    fn settle(&mut self, auction_id: AuctionId) -> Result<(), HouseError> {
        let now = self.clock.now();
        let auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(HouseError::UnknownAuction(auction_id))?;
        if auction.settled {
            return Err(HouseError::AlreadySettled);
        }
        if now < auction.end_time {
            return Err(HouseError::NotEnded {
                end_time: auction.end_time,
            });
        }
        auction.settled = true;
        let winner = auction.bidder.unwrap_or(self.treasury);
        self.owners.insert(auction.token_id, winner);
        self.proceeds += auction.amount;
        tracing::debug!(auction = %auction_id, winner = %winner, "Auction settled");
        Ok(())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    #[must_use]
    pub fn paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn rules(&self) -> HouseRules {
        self.rules
    }

    #[must_use]
    pub fn current_auction(&self) -> Option<AuctionId> {
        self.current
    }

    /// Read one auction.
    pub fn snapshot(&self, auction_id: AuctionId) -> Result<MarketSnapshot, HouseError> {
        let auction = self
            .auctions
            .get(&auction_id)
            .ok_or(HouseError::UnknownAuction(auction_id))?;
        Ok(MarketSnapshot {
            auction_id,
            token_id: auction.token_id,
            highest_bid: auction.amount,
            highest_bidder: auction.bidder,
            end_time: auction.end_time,
            paused: self.paused,
            reserve_price: self.rules.reserve_price,
            settled: auction.settled,
        })
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<Address, HouseError> {
        self.owners
            .get(&token_id)
            .copied()
            .ok_or(HouseError::UnknownToken(token_id))
    }

    /// Wei refunded to `bidder` after being outbid.
    #[must_use]
    pub fn refunds_of(&self, bidder: Address) -> u128 {
        self.refunds.get(&bidder).copied().unwrap_or(0)
    }

    /// Wei collected from settled auctions.
    #[must_use]
    pub fn proceeds(&self) -> u128 {
        self.proceeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partybid_types::ManualClock;

    const START: u64 = 1_700_000_000;

    fn setup(rules: HouseRules) -> (ReserveAuctionHouse, ManualClock, AuctionId) {
        let clock = ManualClock::new(START);
        let mut house =
            ReserveAuctionHouse::new(Arc::new(clock.clone()), rules, Address::dummy(0xee));
        let id = house.create_auction(TokenId(95));
        (house, clock, id)
    }

    #[test]
    fn first_bid_must_meet_reserve() {
        let (mut house, _, id) = setup(HouseRules {
            reserve_price: 100,
            ..HouseRules::default()
        });
        let err = house.create_bid(Address::dummy(1), id, 99).unwrap_err();
        assert_eq!(err, HouseError::BelowReserve { reserve: 100 });
        house.create_bid(Address::dummy(1), id, 100).unwrap();
    }

    #[test]
    fn later_bids_need_increment_and_refund_previous() {
        let (mut house, _, id) = setup(HouseRules::default());
        let alice = Address::dummy(1);
        let bob = Address::dummy(2);
        house.create_bid(alice, id, 1_000).unwrap();

        let err = house.create_bid(bob, id, 1_049).unwrap_err();
        assert_eq!(err, HouseError::IncrementTooLow { minimum: 1_050 });

        house.create_bid(bob, id, 1_050).unwrap();
        assert_eq!(house.refunds_of(alice), 1_000);
        let snap = house.snapshot(id).unwrap();
        assert_eq!(snap.highest_bid, 1_050);
        assert_eq!(snap.highest_bidder, Some(bob));
    }

    #[test]
    fn late_bid_extends_end_time() {
        let (mut house, clock, id) = setup(HouseRules::default());
        let end = house.snapshot(id).unwrap().end_time;
        clock.set(end - 10);
        house.create_bid(Address::dummy(1), id, 10).unwrap();
        let snap = house.snapshot(id).unwrap();
        assert_eq!(snap.end_time, end - 10 + house.rules().time_buffer);
    }

    #[test]
    fn bidding_after_end_or_while_paused_fails() {
        let (mut house, clock, id) = setup(HouseRules::default());
        house.pause();
        assert_eq!(
            house.create_bid(Address::dummy(1), id, 10).unwrap_err(),
            HouseError::Paused
        );
        house.unpause();
        clock.advance(house.rules().duration);
        assert_eq!(
            house.create_bid(Address::dummy(1), id, 10).unwrap_err(),
            HouseError::Expired
        );
    }

    #[test]
    fn settle_entry_points_respect_pause() {
        let (mut house, clock, id) = setup(HouseRules::default());
        house.create_bid(Address::dummy(1), id, 10).unwrap();
        clock.advance(house.rules().duration);

        assert_eq!(house.settle_auction(id).unwrap_err(), HouseError::NotPaused);
        house.pause();
        assert_eq!(
            house.settle_current_and_create_new_auction().unwrap_err(),
            HouseError::Paused
        );
        house.settle_auction(id).unwrap();
        assert_eq!(house.owner_of(TokenId(95)).unwrap(), Address::dummy(1));
        assert_eq!(house.proceeds(), 10);
        assert_eq!(house.settle_auction(id).unwrap_err(), HouseError::AlreadySettled);
    }

    #[test]
    fn settle_before_end_fails() {
        let (mut house, _, id) = setup(HouseRules::default());
        let end_time = house.snapshot(id).unwrap().end_time;
        assert_eq!(
            house.end_auction(id).unwrap_err(),
            HouseError::NotEnded { end_time }
        );
    }

    #[test]
    fn unsold_token_stays_with_treasury() {
        let (mut house, clock, id) = setup(HouseRules::default());
        clock.advance(house.rules().duration);
        let next = house.settle_current_and_create_new_auction().unwrap();
        assert_eq!(house.owner_of(TokenId(95)).unwrap(), Address::dummy(0xee));
        assert_ne!(next, id);
        assert_eq!(house.current_auction(), Some(next));
        assert_eq!(house.snapshot(next).unwrap().token_id, TokenId(96));
    }
}
