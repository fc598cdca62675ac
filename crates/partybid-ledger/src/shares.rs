//! RedeemableShare balances.
//!
//! Only minting and burning are modelled; share transfers between holders
//! belong to the token contract, not the party.

use std::collections::BTreeMap;

use partybid_types::{Address, PartyBidError, Result};

/// Fungible claim on the party pool.
#[derive(Debug, Clone, Default)]
pub struct ShareToken {
    balances: BTreeMap<Address, u128>,
    total_supply: u128,
}

impl ShareToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` to `to`. Nothing changes on overflow.
    pub fn mint(&mut self, to: Address, amount: u128) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(PartyBidError::ArithmeticOverflow {
                context: "share supply",
            })?;
        let balance = self.balance_of(to) + amount;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Burn `amount` from `from`.
    ///
    /// # Errors
    /// Returns [`PartyBidError::InsufficientShares`] if `from` holds less
    /// than `amount`.
    pub fn burn(&mut self, from: Address, amount: u128) -> Result<()> {
        let held = self.balance_of(from);
        if held < amount {
            return Err(PartyBidError::InsufficientShares {
                needed: amount,
                held,
            });
        }
        if held == amount {
            self.balances.remove(&from);
        } else {
            self.balances.insert(from, held - amount);
        }
        self.total_supply -= amount;
        Ok(())
    }

    #[must_use]
    pub fn balance_of(&self, holder: Address) -> u128 {
        self.balances.get(&holder).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Holders with a non-zero balance, in address order.
    pub fn holders(&self) -> impl Iterator<Item = (Address, u128)> + '_ {
        self.balances.iter().map(|(a, b)| (*a, *b))
    }
}
