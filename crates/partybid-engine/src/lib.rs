//! # partybid-engine
//!
//! The party itself: one pooled bidder in one external auction.
//!
//! ## Lifecycle
//!
//! ```text
//! ACTIVE ──finalize──► WON   (party owns the asset; fees charged)
//!    │
//!    └────finalize──► LOST  (everything refundable)
//! ```
//!
//! - [`PartyBid`]: the synchronous state machine. Accepts contributions,
//!   bids the minimum through a [`BidController`], finalizes exactly once,
//!   and pays out redemptions and excess refunds afterwards.
//! - [`PartyService`]: runs a [`PartyBid`] on its own tokio task, serializing
//!   every mutation through a mailbox and publishing a [`PartySnapshot`] on a
//!   watch channel after each committed change.

pub mod bid_controller;
pub mod party;
pub mod service;

pub use bid_controller::{BidController, BidOutcome};
pub use party::{PartyBid, PartySnapshot};
pub use service::{PartyHandle, PartyService};
