//! # partybid-market
//!
//! **Market boundary**: a uniform capability interface over external
//! reserve auction houses.
//!
//! ## Architecture
//!
//! - [`MarketAdapter`]: what the settlement engine may ask of a market:
//!   read state, compute the minimum next bid, bid, finalize, read the
//!   asset owner
//! - [`NounsMarket`] / [`ZoraMarket`]: one adapter per supported house;
//!   they differ only in how they speak to the house
//! - [`ReserveAuctionHouse`]: an in-process reserve auction house with
//!   reserve price, percentage increments, time buffer and pause, used to
//!   run the engine end to end
//!
//! Adapters carry no business logic. Every call reads the house afresh.

pub mod adapter;
pub mod house;
pub mod nouns;
pub mod zora;

pub use adapter::{MarketAdapter, connect};
pub use house::{HouseError, HouseRules, ReserveAuctionHouse, SharedHouse, lock_house};
pub use nouns::NounsMarket;
pub use zora::ZoraMarket;
