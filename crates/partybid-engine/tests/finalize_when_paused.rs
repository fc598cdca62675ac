//! Finalize while the auction house is paused.
//!
//! Each case contributes, replays a bid sequence (party bids and outside
//! bids, in order), pauses the house and then walks the party through
//! finalize. Pausing must block nothing but bidding: once the end time has
//! passed, finalize settles through whichever entry point the house allows.

use std::sync::Arc;

use partybid_engine::{BidOutcome, PartyBid};
use partybid_market::{HouseRules, ReserveAuctionHouse, SharedHouse, connect, lock_house};
use partybid_types::*;

const START: u64 = 1_700_000_000;
const FORTY_EIGHT_HOURS: u64 = 48 * 60 * 60;
const TOKEN: TokenId = TokenId(95);

#[derive(Clone, Copy)]
enum Step {
    /// The party bids through its first contributor.
    Party,
    /// Someone else bids this many ETH directly on the house.
    Outside(&'static str),
}

struct Case {
    reserve: &'static str,
    /// (recipient, basis points)
    split: Option<(u8, u16)>,
    contributions: &'static [(u8, &'static str)],
    bids: &'static [Step],
    final_bid: &'static str,
    total_spent: &'static str,
    party_wins: bool,
}

const CASES: &[Case] = &[
    Case {
        reserve: "1",
        split: None,
        contributions: &[(1, "1.5")],
        bids: &[Step::Party],
        final_bid: "1",
        total_spent: "1.025",
        party_wins: true,
    },
    Case {
        reserve: "1",
        split: None,
        contributions: &[(1, "2"), (2, "1")],
        bids: &[Step::Outside("1"), Step::Party],
        final_bid: "1.05",
        total_spent: "1.07625",
        party_wins: true,
    },
    Case {
        reserve: "1",
        split: None,
        contributions: &[(1, "1")],
        bids: &[Step::Outside("2")],
        final_bid: "2",
        total_spent: "0",
        party_wins: false,
    },
    Case {
        reserve: "1",
        split: None,
        contributions: &[(1, "3")],
        bids: &[Step::Party, Step::Outside("2"), Step::Party, Step::Outside("3")],
        final_bid: "3",
        total_spent: "0",
        party_wins: false,
    },
    Case {
        reserve: "0.5",
        split: Some((3, 1000)),
        contributions: &[(1, "1"), (2, "0.25")],
        bids: &[Step::Party],
        final_bid: "0.5",
        total_spent: "0.5125",
        party_wins: true,
    },
];

fn party_address() -> Address {
    Address::dummy(0xaa)
}

fn multisig() -> Address {
    Address::dummy(0xfe)
}

fn outsider() -> Address {
    Address::dummy(0x0b)
}

fn setup(kind: MarketKind, case: &Case) -> (PartyBid, SharedHouse, ManualClock) {
    let clock = ManualClock::new(START);
    let reserve = eth(case.reserve);
    let mut house = ReserveAuctionHouse::new(
        Arc::new(clock.clone()),
        HouseRules {
            reserve_price: reserve,
            ..HouseRules::default()
        },
        Address::dummy(0xee),
    );
    let auction_id = house.create_auction(TOKEN);
    let house = house.shared();

    let mut config = PartyConfig::new(party_address(), multisig(), kind, auction_id, TOKEN);
    config.auction_reserve_price = reserve;
    if let Some((recipient, bps)) = case.split {
        config.split_recipient = Some(Address::dummy(recipient));
        config.split_basis_points = bps;
    }
    let market = connect(kind, house.clone(), party_address());
    let party = PartyBid::new(config, market, Arc::new(clock.clone())).unwrap();
    (party, house, clock)
}

fn run_case(kind: MarketKind, index: usize, case: &Case) {
    let ctx = format!("{kind} case {index}");
    let (mut party, house, clock) = setup(kind, case);
    let lead = Address::dummy(case.contributions[0].0);

    let mut total_contributed = 0;
    for (signer, amount) in case.contributions {
        party.contribute(Address::dummy(*signer), eth(amount)).unwrap();
        total_contributed += eth(amount);
    }
    for step in case.bids {
        match step {
            Step::Party => {
                let outcome = party.bid(lead).unwrap();
                assert!(matches!(outcome, BidOutcome::Placed { .. }), "{ctx}");
            }
            Step::Outside(amount) => {
                let auction_id = party.config().auction_id;
                lock_house(&house)
                    .create_bid(outsider(), auction_id, eth(amount))
                    .unwrap();
            }
        }
    }
    assert_eq!(party.market_state().unwrap().highest_bid, eth(case.final_bid), "{ctx}");
    lock_house(&house).pause();
    let supply_before = party.total_supply();

    // Does not allow finalize before the auction is over.
    assert!(
        matches!(party.finalize(), Err(PartyBidError::AuctionStillOpen { .. })),
        "{ctx}"
    );
    // Is ACTIVE before finalize.
    assert_eq!(party.party_status(), PartyStatus::Active, "{ctx}");

    // Does allow finalize after the auction is over.
    clock.advance(FORTY_EIGHT_HOURS);
    party.finalize().unwrap();
    assert!(
        matches!(party.events().last(), Some(PartyEvent::Finalized { .. })),
        "{ctx}"
    );

    // Accepts neither contributions nor bids afterwards.
    assert!(
        matches!(
            party.contribute(lead, eth("1")),
            Err(PartyBidError::InvalidState {
                operation: "contribute",
                ..
            })
        ),
        "{ctx}"
    );
    assert!(
        matches!(
            party.bid(lead),
            Err(PartyBidError::InvalidState {
                operation: "bid",
                ..
            })
        ),
        "{ctx}"
    );

    let owner = lock_house(&house).owner_of(TOKEN).unwrap();
    let total_spent = eth(case.total_spent);
    if case.party_wins {
        let eth_fee = bps_of(eth(case.final_bid), constants::ETH_FEE_BASIS_POINTS);
        assert_eq!(party.party_status(), PartyStatus::Won, "{ctx}");
        assert_eq!(owner, party_address(), "{ctx}");
        assert_eq!(party.total_spent(), total_spent, "{ctx}");
        assert_eq!(total_spent, eth(case.final_bid) + eth_fee, "{ctx}");
        assert_eq!(party.payout_balance(multisig()), eth_fee, "{ctx}");
        assert_eq!(party.eth_balance(), total_contributed - total_spent, "{ctx}");

        let token_fee = bps_of(supply_before, constants::TOKEN_FEE_BASIS_POINTS);
        assert_eq!(party.balance_of(multisig()), token_fee, "{ctx}");
        if let Some((recipient, bps)) = case.split {
            assert_eq!(
                party.balance_of(Address::dummy(recipient)),
                bps_of(supply_before - token_fee, bps),
                "{ctx}"
            );
        }
    } else {
        assert_eq!(party.party_status(), PartyStatus::Lost, "{ctx}");
        assert_ne!(owner, party_address(), "{ctx}");
        assert_eq!(party.total_spent(), 0, "{ctx}");
        assert_eq!(party.payout_balance(multisig()), 0, "{ctx}");
        assert_eq!(party.eth_balance(), total_contributed, "{ctx}");
        assert_eq!(party.total_supply(), supply_before, "{ctx}");
    }
    party.verify_conservation().unwrap();
}

#[test]
fn nouns_finalize_when_paused() {
    for (i, case) in CASES.iter().enumerate() {
        run_case(MarketKind::Nouns, i, case);
    }
}

#[test]
fn zora_finalize_when_paused() {
    for (i, case) in CASES.iter().enumerate() {
        run_case(MarketKind::Zora, i, case);
    }
}

#[test]
fn table_matches_fee_rule() {
    for case in CASES.iter().filter(|c| c.party_wins) {
        let bid = eth(case.final_bid);
        assert_eq!(
            eth(case.total_spent),
            bid + bps_of(bid, constants::ETH_FEE_BASIS_POINTS)
        );
    }
}
