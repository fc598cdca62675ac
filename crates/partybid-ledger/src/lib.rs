//! # partybid-ledger
//!
//! **Contribution Ledger**: the leaf bookkeeping layer of a party.
//!
//! ## Architecture
//!
//! 1. **ContributionLedger**: records who put in what and when, splits
//!    each deposit into an accepted portion and an excess portion
//! 2. **ShareToken**: the fungible RedeemableShare balances minted 1:`token_scale`
//!    against accepted wei and burned on redemption
//! 3. **PayoutBook**: wei credited to accounts outside the party (fees,
//!    redemptions, excess refunds)
//! 4. **FundsConservation**: inflow/outflow totals checked against the
//!    party's actual holdings
//!
//! The ledger knows nothing about party status; the settlement engine gates
//! every call on it.

pub mod conservation;
pub mod ledger;
pub mod payouts;
pub mod shares;

pub use conservation::{FundsConservation, Outflow};
pub use ledger::ContributionLedger;
pub use payouts::PayoutBook;
pub use shares::ShareToken;
