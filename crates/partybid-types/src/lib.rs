//! # partybid-types
//!
//! Shared types, errors, and configuration for the **PartyBid** pooled-bid
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AuctionId`], [`TokenId`], [`ContributionId`]
//! - **Party model**: [`PartyStatus`], [`Contribution`], [`ContributionReceipt`], [`PartyEvent`]
//! - **Market model**: [`MarketKind`], [`MarketSnapshot`]
//! - **Fee arithmetic**: [`FeeSchedule`], [`FeeSplit`], [`bps_of`], [`mul_div`]
//! - **Units**: [`eth`], [`wei_to_eth`]
//! - **Time**: [`Clock`], [`SystemClock`], [`ManualClock`]
//! - **Configuration**: [`PartyConfig`]
//! - **Errors**: [`PartyBidError`] with `PB_ERR_` prefix codes
//! - **Constants**: fee defaults and basis-point denominator

pub mod clock;
pub mod config;
pub mod constants;
pub mod contribution;
pub mod error;
pub mod event;
pub mod fees;
pub mod ids;
pub mod market;
pub mod status;
pub mod units;

pub use clock::*;
pub use config::*;
pub use contribution::*;
pub use error::*;
pub use event::*;
pub use fees::*;
pub use ids::*;
pub use market::*;
pub use status::*;
pub use units::*;

// Constants are accessed via `partybid_types::constants::FOO`
// (not re-exported to avoid name collisions).
