//! Actor wrapper around [`PartyBid`].
//!
//! One task owns the party. Callers talk to it through a cloneable
//! [`PartyHandle`]; each request carries a oneshot for its reply, so
//! mutations are applied strictly in mailbox order. After every successful
//! mutation the task publishes a fresh [`PartySnapshot`] on a watch channel.

use partybid_types::{Address, ContributionReceipt, PartyBidError, PartyStatus, Result};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

use crate::{
    bid_controller::BidOutcome,
    party::{PartyBid, PartySnapshot},
};

type Reply<T> = oneshot::Sender<Result<T>>;

enum Command {
    Contribute {
        contributor: Address,
        amount: u128,
        reply: Reply<ContributionReceipt>,
    },
    Bid {
        caller: Address,
        reply: Reply<BidOutcome>,
    },
    Finalize {
        reply: Reply<PartyStatus>,
    },
    Redeem {
        holder: Address,
        shares: u128,
        reply: Reply<u128>,
    },
    ClaimExcess {
        contributor: Address,
        reply: Reply<u128>,
    },
    VerifyConservation {
        reply: Reply<()>,
    },
}

/// Spawns party actors.
pub struct PartyService;

impl PartyService {
    /// Move `party` onto its own task. The task ends once every handle is
    /// dropped and hands the party back through the join handle.
    pub fn spawn(party: PartyBid, mailbox: usize) -> (PartyHandle, JoinHandle<PartyBid>) {
        let (commands, receiver) = mpsc::channel(mailbox.max(1));
        let (publisher, snapshot) = watch::channel(party.snapshot());
        let task = tokio::spawn(run(party, receiver, publisher));
        (PartyHandle { commands, snapshot }, task)
    }
}

async fn run(
    mut party: PartyBid,
    mut commands: mpsc::Receiver<Command>,
    publisher: watch::Sender<PartySnapshot>,
) -> PartyBid {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Contribute {
                contributor,
                amount,
                reply,
            } => {
                let result = party.contribute(contributor, amount);
                commit(&party, &publisher, reply, result);
            }
            Command::Bid { caller, reply } => {
                let result = party.bid(caller);
                commit(&party, &publisher, reply, result);
            }
            Command::Finalize { reply } => {
                let result = party.finalize();
                commit(&party, &publisher, reply, result);
            }
            Command::Redeem {
                holder,
                shares,
                reply,
            } => {
                let result = party.redeem(holder, shares);
                commit(&party, &publisher, reply, result);
            }
            Command::ClaimExcess { contributor, reply } => {
                let result = party.claim_excess(contributor);
                commit(&party, &publisher, reply, result);
            }
            Command::VerifyConservation { reply } => {
                let _ = reply.send(party.verify_conservation());
            }
        }
    }
    tracing::debug!(party = %party.config().party_address, "Party actor stopped");
    party
}

/// Publish the new state if `result` is a success, then reply. Readers
/// therefore never observe a reply before the state it describes.
fn commit<T>(
    party: &PartyBid,
    publisher: &watch::Sender<PartySnapshot>,
    reply: Reply<T>,
    result: Result<T>,
) {
    if result.is_ok() {
        publisher.send_replace(party.snapshot());
    }
    // The caller may have stopped waiting; the mutation still stands.
    let _ = reply.send(result);
}

/// Cloneable client for one party actor.
#[derive(Clone)]
pub struct PartyHandle {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<PartySnapshot>,
}

impl PartyHandle {
    async fn call<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| PartyBidError::ServiceUnavailable)?;
        response.await.map_err(|_| PartyBidError::ServiceUnavailable)?
    }

    pub async fn contribute(&self, contributor: Address, amount: u128) -> Result<ContributionReceipt> {
        self.call(|reply| Command::Contribute {
            contributor,
            amount,
            reply,
        })
        .await
    }

    pub async fn bid(&self, caller: Address) -> Result<BidOutcome> {
        self.call(|reply| Command::Bid { caller, reply }).await
    }

    pub async fn finalize(&self) -> Result<PartyStatus> {
        self.call(|reply| Command::Finalize { reply }).await
    }

    pub async fn redeem(&self, holder: Address, shares: u128) -> Result<u128> {
        self.call(|reply| Command::Redeem {
            holder,
            shares,
            reply,
        })
        .await
    }

    pub async fn claim_excess(&self, contributor: Address) -> Result<u128> {
        self.call(|reply| Command::ClaimExcess { contributor, reply })
            .await
    }

    pub async fn verify_conservation(&self) -> Result<()> {
        self.call(|reply| Command::VerifyConservation { reply }).await
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> PartySnapshot {
        self.snapshot.borrow().clone()
    }

    /// A receiver that wakes on every committed mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PartySnapshot> {
        self.snapshot.clone()
    }
}
