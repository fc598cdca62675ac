//! The party state machine.
//!
//! Every mutation follows the same shape: check status, compute every
//! number the mutation needs, and only then write. A call that returns an
//! error has changed nothing.
//!
//! ETH accounting: the party's balance rises on contributions and falls
//! only on finalize (winning bid and ETH fee, when WON), redemptions, and
//! excess refunds. Bids in flight are escrowed by the house and refunded on
//! outbid, so they are not outflows.

use std::sync::Arc;

use partybid_ledger::{ContributionLedger, FundsConservation, Outflow, PayoutBook};
use partybid_market::MarketAdapter;
use partybid_types::{
    Address, Clock, ContributionReceipt, FeeSchedule, FeeSplit, MarketSnapshot, PartyBidError,
    PartyConfig, PartyEvent, PartyStatus, Result, constants, max_bid_with_fee,
};
use serde::{Deserialize, Serialize};

use crate::bid_controller::{BidController, BidOutcome};

/// Read-only view of a party at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySnapshot {
    pub status: PartyStatus,
    pub total_contributed: u128,
    pub total_spent: u128,
    pub highest_bid: u128,
    pub total_supply: u128,
    pub eth_balance: u128,
    pub redeemable_eth_balance: u128,
    pub excess_contributions: u128,
    pub event_count: usize,
}

/// One pooled bidder in one auction.
pub struct PartyBid {
    config: PartyConfig,
    fees: FeeSchedule,
    ledger: ContributionLedger,
    market: Box<dyn MarketAdapter>,
    clock: Arc<dyn Clock>,
    status: PartyStatus,
    /// The party's last accepted bid.
    highest_bid: u128,
    total_spent: u128,
    fee_split: FeeSplit,
    eth_balance: u128,
    payouts: PayoutBook,
    conservation: FundsConservation,
    events: Vec<PartyEvent>,
}

impl PartyBid {
    /// Create an ACTIVE party.
    ///
    /// # Errors
    /// `Configuration` if `config` is invalid or `market` is not the house
    /// kind the config names.
    pub fn new(
        config: PartyConfig,
        market: Box<dyn MarketAdapter>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        if market.kind() != config.market {
            return Err(PartyBidError::Configuration(format!(
                "config names market {} but adapter is {}",
                config.market,
                market.kind()
            )));
        }
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            party = %config.party_address,
            market = %config.market,
            auction = %config.auction_id,
            token = %config.token_id,
            "Party created"
        );
        Ok(Self {
            fees: config.fee_schedule(),
            ledger: ContributionLedger::new(config.token_scale, config.contribution_ceiling),
            config,
            market,
            clock,
            status: PartyStatus::Active,
            highest_bid: 0,
            total_spent: 0,
            fee_split: FeeSplit::default(),
            eth_balance: 0,
            payouts: PayoutBook::new(),
            conservation: FundsConservation::new(),
            events: Vec::new(),
        })
    }

    fn require_active(&self, operation: &'static str) -> Result<()> {
        if self.status.is_active() {
            Ok(())
        } else {
            Err(PartyBidError::InvalidState {
                operation,
                status: self.status,
            })
        }
    }

    fn require_finalized(&self, operation: &'static str) -> Result<()> {
        if self.status.is_finalized() {
            Ok(())
        } else {
            Err(PartyBidError::InvalidState {
                operation,
                status: self.status,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Contributions & bidding
    // -----------------------------------------------------------------------

    /// Deposit `amount` wei from `contributor`.
    ///
    /// # Errors
    /// - `InvalidState` unless ACTIVE
    /// - `InvalidAmount` if `amount` is zero
    pub fn contribute(&mut self, contributor: Address, amount: u128) -> Result<ContributionReceipt> {
        self.require_active("contribute")?;
        let receipt = self
            .ledger
            .record(contributor, amount, self.clock.now_utc())?;

        self.eth_balance += amount;
        self.conservation.record_inflow(amount);
        let c = &receipt.contribution;
        self.events.push(PartyEvent::Contributed {
            contributor,
            amount,
            excess: c.excess,
            shares: c.shares,
            total_contributed: receipt.total_contributed,
        });
        tracing::info!(
            contributor = %contributor,
            amount,
            shares = c.shares,
            total_contributed = receipt.total_contributed,
            digest = %receipt.digest_hex(),
            "Contribution accepted"
        );
        Ok(receipt)
    }

    /// Most the party may bid while leaving room for the ETH fee.
    #[must_use]
    pub fn max_bid(&self) -> u128 {
        max_bid_with_fee(self.ledger.total_accepted(), self.fees.eth_fee_bps)
    }

    fn bid_controller(&self) -> BidController<'_> {
        BidController::new(
            self.market.as_ref(),
            self.config.auction_id,
            self.config.party_address,
            self.config.auction_reserve_price,
        )
    }

    /// Smallest bid that would take the lead right now.
    ///
    /// # Errors
    /// `MarketRejected` if the market cannot be read.
    pub fn minimum_bid(&self) -> Result<u128> {
        self.bid_controller().minimum_valid_bid()
    }

    /// Bid the minimum valid amount on behalf of the party.
    ///
    /// # Errors
    /// - `InvalidState` unless ACTIVE
    /// - `NotContributor` if `caller` never contributed
    /// - `MarketPaused`, `InsufficientFunds`, `MarketRejected` from the
    ///   bid attempt
    pub fn bid(&mut self, caller: Address) -> Result<BidOutcome> {
        self.require_active("bid")?;
        if self.ledger.total_contributed_by(caller) == 0 {
            return Err(PartyBidError::NotContributor(caller));
        }

        let outcome = self.bid_controller().attempt_bid(self.max_bid())?;

        if let BidOutcome::Placed { amount } = outcome {
            self.highest_bid = amount;
            self.events.push(PartyEvent::Bid { amount });
            tracing::info!(
                auction = %self.config.auction_id,
                caller = %caller,
                amount,
                "Bid placed"
            );
        }
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Finalize
    // -----------------------------------------------------------------------

    /// Settle the auction and fix the party's outcome. Runs at most once.
    ///
    /// # Errors
    /// - `AlreadyFinalized` if the party is WON or LOST
    /// - `AuctionStillOpen` if the end time has not passed on this clock
    /// - `NotYetEndable` if the house still refuses to settle
    /// - `MarketFinalizeFailed` for any other market failure
    pub fn finalize(&mut self) -> Result<PartyStatus> {
        if self.status.is_finalized() {
            return Err(PartyBidError::AlreadyFinalized {
                status: self.status,
            });
        }

        let auction_id = self.config.auction_id;
        let snapshot = self
            .market
            .current_state(auction_id)
            .map_err(|e| PartyBidError::MarketFinalizeFailed {
                reason: e.to_string(),
            })?;
        let now = self.clock.now();
        if !snapshot.has_ended(now) {
            return Err(PartyBidError::AuctionStillOpen {
                end_time: snapshot.end_time,
                now,
            });
        }

        self.market.finalize(auction_id).map_err(|e| match e {
            PartyBidError::NotYetEndable { .. } | PartyBidError::MarketFinalizeFailed { .. } => e,
            other => PartyBidError::MarketFinalizeFailed {
                reason: other.to_string(),
            },
        })?;
        let owner = self
            .market
            .owner_of(self.config.token_id)
            .map_err(|e| PartyBidError::MarketFinalizeFailed {
                reason: e.to_string(),
            })?;

        let won = owner == self.config.party_address;
        let (status, fees, total_spent) = if won {
            let supply = self.ledger.shares().total_supply();
            let fees = FeeSplit::compute(&self.fees, self.highest_bid, supply);
            let total_spent = fees.total_spent(self.highest_bid)?;
            if total_spent > self.eth_balance {
                return Err(PartyBidError::ConservationViolation {
                    reason: format!(
                        "total spent {total_spent} exceeds balance {}",
                        self.eth_balance
                    ),
                });
            }
            supply
                .checked_add(fees.token_fee)
                .and_then(|s| s.checked_add(fees.split_recipient_share))
                .ok_or(PartyBidError::ArithmeticOverflow {
                    context: "fee mint",
                })?;
            (PartyStatus::Won, fees, total_spent)
        } else {
            (PartyStatus::Lost, FeeSplit::default(), 0)
        };

        if !self.status.can_transition_to(status) {
            return Err(PartyBidError::InvalidState {
                operation: "finalize",
                status: self.status,
            });
        }
        self.status = status;
        self.total_spent = total_spent;
        self.fee_split = fees;

        if won {
            self.eth_balance -= total_spent;
            self.conservation
                .record_outflow(Outflow::WinningBid, self.highest_bid);
            self.conservation.record_outflow(Outflow::EthFee, fees.eth_fee);
            self.payouts.credit(self.config.fee_recipient, fees.eth_fee)?;
            self.ledger
                .mint_shares(self.config.fee_recipient, fees.token_fee)?;
            if let Some(split_recipient) = self.config.split_recipient {
                self.ledger
                    .mint_shares(split_recipient, fees.split_recipient_share)?;
            }
        }

        self.events.push(PartyEvent::Finalized {
            status,
            total_spent,
            fees,
        });
        tracing::info!(
            auction = %auction_id,
            status = %status,
            owner = %owner,
            total_spent,
            eth_fee = fees.eth_fee,
            token_fee = fees.token_fee,
            "Party finalized"
        );
        Ok(status)
    }

    // -----------------------------------------------------------------------
    // Payouts
    // -----------------------------------------------------------------------

    /// Burn `shares` from `holder` and pay out their cut of the pool.
    ///
    /// # Errors
    /// - `InvalidState` while ACTIVE
    /// - `InvalidAmount` if `shares` is zero
    /// - `InsufficientShares` if `holder` holds fewer
    pub fn redeem(&mut self, holder: Address, shares: u128) -> Result<u128> {
        self.require_finalized("redeem")?;
        let pool = self.redeemable_eth_balance();
        let amount = self.ledger.redeem(holder, shares, pool)?;

        self.eth_balance -= amount;
        self.conservation.record_outflow(Outflow::Redemption, amount);
        self.payouts.credit(holder, amount)?;
        self.events.push(PartyEvent::Redeemed {
            contributor: holder,
            shares,
            amount,
        });
        tracing::info!(holder = %holder, shares, amount, "Shares redeemed");
        Ok(amount)
    }

    /// Refund the excess `contributor` put in beyond the ceiling.
    ///
    /// # Errors
    /// - `InvalidState` while ACTIVE
    /// - `NothingToClaim` if no excess is owed
    pub fn claim_excess(&mut self, contributor: Address) -> Result<u128> {
        self.require_finalized("claim_excess")?;
        let amount = self.ledger.take_excess(contributor)?;

        self.eth_balance -= amount;
        self.conservation.record_outflow(Outflow::ExcessRefund, amount);
        self.payouts.credit(contributor, amount)?;
        self.events.push(PartyEvent::ExcessClaimed {
            contributor,
            amount,
        });
        tracing::info!(contributor = %contributor, amount, "Excess refunded");
        Ok(amount)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn party_status(&self) -> PartyStatus {
        self.status
    }

    #[must_use]
    pub fn total_spent(&self) -> u128 {
        self.total_spent
    }

    #[must_use]
    pub fn highest_bid(&self) -> u128 {
        self.highest_bid
    }

    /// Wei still owed to share holders. Zero while ACTIVE.
    #[must_use]
    pub fn redeemable_eth_balance(&self) -> u128 {
        if self.status.is_active() {
            return 0;
        }
        self.ledger
            .total_contributed()
            .saturating_sub(self.total_spent)
            .saturating_sub(self.ledger.total_excess())
            .saturating_sub(self.conservation.total_outflow(Outflow::Redemption))
    }

    /// Wei `shares` would redeem right now.
    #[must_use]
    pub fn redeem_amount(&self, shares: u128) -> u128 {
        self.ledger.redeem_amount(self.redeemable_eth_balance(), shares)
    }

    #[must_use]
    pub fn total_contributed_by(&self, contributor: Address) -> u128 {
        self.ledger.total_contributed_by(contributor)
    }

    #[must_use]
    pub fn total_contributed(&self) -> u128 {
        self.ledger.total_contributed()
    }

    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.ledger.shares().total_supply()
    }

    #[must_use]
    pub fn balance_of(&self, holder: Address) -> u128 {
        self.ledger.shares().balance_of(holder)
    }

    /// Excess still owed to `contributor`.
    #[must_use]
    pub fn excess_contributions(&self, contributor: Address) -> u128 {
        self.ledger.excess_owed(contributor)
    }

    /// Excess still owed across the whole party. Together with
    /// [`Self::redeemable_eth_balance`] this is what a finalized party holds.
    #[must_use]
    pub fn total_excess_contributions(&self) -> u128 {
        self.ledger.outstanding_excess()
    }

    /// Wei the party currently holds.
    #[must_use]
    pub fn eth_balance(&self) -> u128 {
        self.eth_balance
    }

    /// Wei the party has paid to `account`: fees, redemptions, refunds.
    #[must_use]
    pub fn payout_balance(&self, account: Address) -> u128 {
        self.payouts.balance(account)
    }

    #[must_use]
    pub fn fee_split(&self) -> FeeSplit {
        self.fee_split
    }

    #[must_use]
    pub fn events(&self) -> &[PartyEvent] {
        &self.events
    }

    #[must_use]
    pub fn config(&self) -> &PartyConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &ContributionLedger {
        &self.ledger
    }

    /// Fresh read of the auction this party bids on.
    pub fn market_state(&self) -> Result<MarketSnapshot> {
        self.market.current_state(self.config.auction_id)
    }

    #[must_use]
    pub fn snapshot(&self) -> PartySnapshot {
        PartySnapshot {
            status: self.status,
            total_contributed: self.ledger.total_contributed(),
            total_spent: self.total_spent,
            highest_bid: self.highest_bid,
            total_supply: self.total_supply(),
            eth_balance: self.eth_balance,
            redeemable_eth_balance: self.redeemable_eth_balance(),
            excess_contributions: self.total_excess_contributions(),
            event_count: self.events.len(),
        }
    }

    /// Check that no wei was created or lost.
    ///
    /// While ACTIVE the party holds every contribution. Once finalized:
    /// ```text
    /// total_contributed == total_spent + redeemable + outstanding excess
    ///                      + redeemed + excess claimed
    /// ```
    /// Share balances must also sum to the share supply.
    ///
    /// # Errors
    /// `ConservationViolation` naming the mismatch.
    pub fn verify_conservation(&self) -> Result<()> {
        self.conservation.verify(self.eth_balance)?;

        let shares = self.ledger.shares();
        let held = shares
            .holders()
            .try_fold(0u128, |acc, (_, balance)| acc.checked_add(balance));
        if held != Some(shares.total_supply()) {
            return Err(PartyBidError::ConservationViolation {
                reason: format!(
                    "share balances sum to {held:?} but supply is {}",
                    shares.total_supply()
                ),
            });
        }

        let contributed = self.ledger.total_contributed();
        let accounted = if self.status.is_active() {
            Some(self.eth_balance)
        } else {
            [
                self.redeemable_eth_balance(),
                self.ledger.outstanding_excess(),
                self.conservation.total_outflow(Outflow::Redemption),
                self.conservation.total_outflow(Outflow::ExcessRefund),
            ]
            .into_iter()
            .try_fold(self.total_spent, u128::checked_add)
        };
        if accounted == Some(contributed) {
            Ok(())
        } else {
            Err(PartyBidError::ConservationViolation {
                reason: format!(
                    "contributed {contributed} but accounted {accounted:?} while {}",
                    self.status
                ),
            })
        }
    }
}
