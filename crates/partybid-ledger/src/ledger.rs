//! Contribution ledger.
//!
//! Records every deposit in submission order and mints RedeemableShares
//! against the accepted portion. All mutations are atomic: every check and
//! every sum is computed before the first field is written, so a failed
//! call leaves the ledger untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use partybid_types::{
    Address, Contribution, ContributionId, ContributionReceipt, PartyBidError, Result, mul_div,
};

use crate::shares::ShareToken;

/// Who put in what, and what they can claim back.
#[derive(Debug, Clone)]
pub struct ContributionLedger {
    contributions: Vec<Contribution>,
    by_contributor: BTreeMap<Address, u128>,
    /// Excess still owed, per contributor.
    excess_owed: BTreeMap<Address, u128>,
    total_contributed: u128,
    total_excess: u128,
    shares: ShareToken,
    token_scale: u128,
    ceiling: Option<u128>,
}

impl ContributionLedger {
    /// Create an empty ledger minting `token_scale` shares per accepted wei,
    /// accepting at most `ceiling` wei toward bidding.
    #[must_use]
    pub fn new(token_scale: u128, ceiling: Option<u128>) -> Self {
        Self {
            contributions: Vec::new(),
            by_contributor: BTreeMap::new(),
            excess_owed: BTreeMap::new(),
            total_contributed: 0,
            total_excess: 0,
            shares: ShareToken::new(),
            token_scale,
            ceiling,
        }
    }

    /// Record a contribution made at `recorded_at` and mint its shares.
    ///
    /// Wei beyond the ceiling is recorded as excess: it counts toward
    /// `total_contributed` but mints nothing and is refundable in full.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is zero
    /// - `ArithmeticOverflow` if any total would overflow
    pub fn record(
        &mut self,
        contributor: Address,
        amount: u128,
        recorded_at: DateTime<Utc>,
    ) -> Result<ContributionReceipt> {
        if amount == 0 {
            return Err(PartyBidError::InvalidAmount {
                reason: "contribution must be greater than zero".into(),
            });
        }

        let room = self
            .ceiling
            .map_or(u128::MAX, |c| c.saturating_sub(self.total_accepted()));
        let accepted = amount.min(room);
        let excess = amount - accepted;

        let overflow = |context| PartyBidError::ArithmeticOverflow { context };
        let shares = accepted
            .checked_mul(self.token_scale)
            .ok_or(overflow("share mint"))?;
        let total_contributed = self
            .total_contributed
            .checked_add(amount)
            .ok_or(overflow("total contributed"))?;
        let contributor_total = self
            .total_contributed_by(contributor)
            .checked_add(amount)
            .ok_or(overflow("contributor total"))?;

        self.shares.mint(contributor, shares)?;

        let contribution = Contribution {
            id: ContributionId::new(),
            contributor,
            amount,
            excess,
            shares,
            sequence: self.contributions.len() as u64,
            recorded_at,
        };

        self.total_contributed = total_contributed;
        self.by_contributor.insert(contributor, contributor_total);
        if excess > 0 {
            self.total_excess += excess;
            *self.excess_owed.entry(contributor).or_default() += excess;
            tracing::warn!(
                contributor = %contributor,
                excess,
                "Contribution exceeds ceiling; excess held for refund"
            );
        }
        self.contributions.push(contribution.clone());

        Ok(ContributionReceipt::new(
            contribution,
            contributor_total,
            total_contributed,
        ))
    }

    /// Sum of `contributor`'s contributions, excess included.
    #[must_use]
    pub fn total_contributed_by(&self, contributor: Address) -> u128 {
        self.by_contributor.get(&contributor).copied().unwrap_or(0)
    }

    /// Sum of all contributions, excess included.
    #[must_use]
    pub fn total_contributed(&self) -> u128 {
        self.total_contributed
    }

    /// Wei usable for bidding: everything not classified as excess.
    #[must_use]
    pub fn total_accepted(&self) -> u128 {
        self.total_contributed - self.total_excess
    }

    /// Excess recorded over the party's lifetime, refunded or not.
    #[must_use]
    pub fn total_excess(&self) -> u128 {
        self.total_excess
    }

    /// Excess still owed to `contributor`.
    #[must_use]
    pub fn excess_owed(&self, contributor: Address) -> u128 {
        self.excess_owed.get(&contributor).copied().unwrap_or(0)
    }

    /// Excess still owed across all contributors.
    #[must_use]
    pub fn outstanding_excess(&self) -> u128 {
        self.excess_owed.values().sum()
    }

    /// Remove and return what `contributor` is owed in excess.
    ///
    /// # Errors
    /// Returns [`PartyBidError::NothingToClaim`] when nothing is owed.
    pub fn take_excess(&mut self, contributor: Address) -> Result<u128> {
        self.excess_owed
            .remove(&contributor)
            .filter(|owed| *owed > 0)
            .ok_or(PartyBidError::NothingToClaim(contributor))
    }

    /// `floor(pool * shares / total_supply)`; zero when nothing is minted.
    #[must_use]
    pub fn redeem_amount(&self, pool: u128, shares: u128) -> u128 {
        let supply = self.shares.total_supply();
        if supply == 0 {
            return 0;
        }
        mul_div(pool, shares, supply).unwrap_or(0)
    }

    /// Burn `shares` from `holder` and return their cut of `pool`.
    ///
    /// The cut is computed against the supply *before* the burn, so each
    /// redemption truncates in the pool's favour and the final holder
    /// collects whatever dust is left.
    ///
    /// # Errors
    /// - `InvalidAmount` if `shares` is zero
    /// - `InsufficientShares` if `holder` holds fewer than `shares`
    pub fn redeem(&mut self, holder: Address, shares: u128, pool: u128) -> Result<u128> {
        if shares == 0 {
            return Err(PartyBidError::InvalidAmount {
                reason: "redeemed share amount must be greater than zero".into(),
            });
        }
        let amount = self.redeem_amount(pool, shares);
        self.shares.burn(holder, shares)?;
        Ok(amount)
    }

    /// Mint shares that no contribution backs (fees, split credits).
    pub fn mint_shares(&mut self, to: Address, shares: u128) -> Result<()> {
        if shares == 0 {
            return Ok(());
        }
        self.shares.mint(to, shares)
    }

    #[must_use]
    pub fn shares(&self) -> &ShareToken {
        &self.shares
    }

    #[must_use]
    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    #[must_use]
    pub fn token_scale(&self) -> u128 {
        self.token_scale
    }
}
