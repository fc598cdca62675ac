//! Wei credited to accounts outside the party.
//!
//! Every transfer the party makes (ETH fee, redemption, excess refund) is a
//! credit here. Credits never fail except on overflow, and they are the
//! last step of any operation, after the party state is already final.

use std::collections::BTreeMap;

use partybid_types::{Address, PartyBidError, Result};

/// Per-account wei received from the party.
#[derive(Debug, Clone, Default)]
pub struct PayoutBook {
    credited: BTreeMap<Address, u128>,
    total_paid: u128,
}

impl PayoutBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` wei to `to`.
    pub fn credit(&mut self, to: Address, amount: u128) -> Result<()> {
        let total = self
            .total_paid
            .checked_add(amount)
            .ok_or(PartyBidError::ArithmeticOverflow { context: "payouts" })?;
        *self.credited.entry(to).or_default() += amount;
        self.total_paid = total;
        Ok(())
    }

    /// Wei received by `account` so far.
    #[must_use]
    pub fn balance(&self, account: Address) -> u128 {
        self.credited.get(&account).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_paid(&self) -> u128 {
        self.total_paid
    }
}
