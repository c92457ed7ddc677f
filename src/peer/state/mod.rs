use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::election::{ElectionState, SeniorResponse};
use crate::identity::{Address, Group, PeerId};


pub type ProtectedPeer = Arc<Mutex<PeerState>>;

/// Local view of one peer instance: membership, election status and leader.
#[derive(Debug, Clone)]
pub struct PeerState {
    pub id: PeerId,
    pub address: Address,
    group: Group,

    pub status: ElectionState,
    pub current_leader: Option<PeerId>,

    round: u64,
    attempted_seniors: usize,
    unreachable_seniors: usize,
    awaiting_since: Option<Instant>,
}

/// Seniors to contact in a freshly started election.
#[derive(Debug, Clone)]
pub struct ElectionRound {
    pub round: u64,
    pub seniors: Vec<(PeerId, Address)>,
    pub group: Group,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ReplyDecision {
    /// The reply belongs to a finished or superseded election.
    Ignore,
    KeepWaiting,
    AwaitWinner,
    BecomeLeader,
}

/// Peers to notify after this instance took the leadership.
#[derive(Debug, Clone)]
pub struct Leadership {
    pub others: Vec<(PeerId, Address)>,
    pub group: Group,
}

impl PeerState {
    pub fn new(id: PeerId, address: Address) -> PeerState {
        let mut group = Group::new();
        group.insert(id, address.clone());

        PeerState {
            id,
            address,
            group,
            status: ElectionState::Initial,
            current_leader: None,
            round: 0,
            attempted_seniors: 0,
            unreachable_seniors: 0,
            awaiting_since: None,
        }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Merges a membership snapshot. The own entry always keeps the own address.
    pub fn merge_group(&mut self, snapshot: &Group) {
        self.group.merge(snapshot);
        self.group.insert(self.id, self.address.clone());
    }

    pub fn begin_election(&mut self) -> ElectionRound {
        self.round += 1;
        self.status = ElectionState::InElection;
        self.awaiting_since = None;

        let seniors = self.group.seniors_of(&self.id);
        self.attempted_seniors = seniors.len();
        self.unreachable_seniors = 0;

        ElectionRound {
            round: self.round,
            seniors,
            group: self.group.clone(),
        }
    }

    /// Applies one senior's response to the running election. The first OK wins; the
    /// leadership is taken only when every senior of the round was unreachable.
    pub fn record_response(&mut self, round: u64, response: SeniorResponse) -> ReplyDecision {
        if round != self.round || self.status != ElectionState::InElection {
            return ReplyDecision::Ignore;
        }

        match response {
            SeniorResponse::Ok => {
                self.status = ElectionState::AwaitingWinner;
                self.awaiting_since = Some(Instant::now());
                ReplyDecision::AwaitWinner
            }
            SeniorResponse::Unreachable => {
                self.unreachable_seniors += 1;
                if self.unreachable_seniors >= self.attempted_seniors {
                    ReplyDecision::BecomeLeader
                } else {
                    ReplyDecision::KeepWaiting
                }
            }
        }
    }

    pub fn become_leader(&mut self) -> Leadership {
        self.current_leader = Some(self.id);
        self.status = ElectionState::Initial;
        self.awaiting_since = None;

        Leadership {
            others: self.group.others(&self.id),
            group: self.group.clone(),
        }
    }

    /// A COORDINATOR always overrides the current belief.
    pub fn accept_coordinator(&mut self, leader: PeerId) {
        self.current_leader = Some(leader);
        self.status = ElectionState::Initial;
        self.awaiting_since = None;
    }

    /// Time left before a peer stuck in `AwaitingWinner` starts over. `None` when the
    /// peer is not waiting or no timeout applies.
    pub fn winner_wait_remaining(&self, winner_timeout: Option<Duration>) -> Option<Duration> {
        match (self.status, self.awaiting_since, winner_timeout) {
            (ElectionState::AwaitingWinner, Some(since), Some(timeout)) => {
                Some(timeout.checked_sub(since.elapsed()).unwrap_or_default())
            }
            _ => None,
        }
    }
}
