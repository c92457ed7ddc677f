use crossbeam_channel::Receiver;
use std::time::Duration;

use crate::common;
use crate::communication::PeerCommunicator;
use crate::election::administrator::{Elections, ElectionsChannelRx};
use crate::election::election_attempt::{contact_senior, ElectionAttemptParams};
use crate::election::leadership_announcer::{announce_leadership, LeadershipAnnouncerParams};
use crate::election::{ElectionEvent, ElectionState, SeniorResponseInfo};
use crate::identity::PeerId;
use crate::peer::state::{ProtectedPeer, ReplyDecision};

pub struct ElectionManagerParams<Pc, El>
where
    Pc: PeerCommunicator,
    El: Elections + ElectionsChannelRx,
{
    pub protected_peer: ProtectedPeer,
    pub elections: El,
    pub peer_communicator: Pc,
    pub winner_timeout: Option<Duration>,
}

pub fn run_election_manager<Pc, El>(
    params: ElectionManagerParams<Pc, El>,
    terminate_worker_rx: Receiver<()>,
) where
    Pc: PeerCommunicator,
    El: Elections + ElectionsChannelRx,
{
    info!("Election manager worker started");
    loop {
        let winner_wait = params
            .protected_peer
            .lock()
            .winner_wait_remaining(params.winner_timeout);
        let winner_timeout = match winner_wait {
            Some(remaining) => crossbeam_channel::after(remaining),
            None => crossbeam_channel::never(),
        };

        select!(
            recv(terminate_worker_rx) -> res  => {
                if res.is_err() {
                    error!("Abnormal exit for election manager worker");
                }
                break
            },
            recv(winner_timeout) -> _ => {
                info!("No COORDINATOR received in time. Starting new election");
                initiate_election(&params);
            },
            recv(params.elections.election_event_rx()) -> event_result => {
                match event_result {
                    Ok(event) => change_election_state(&params, event),
                    Err(err) => {
                        error!("Invalid result from election_event_rx: {}", err);
                        break
                    }
                }
            }
        );
    }
    info!("Election manager worker stopped");
}

fn change_election_state<Pc, El>(params: &ElectionManagerParams<Pc, El>, event: ElectionEvent)
where
    Pc: PeerCommunicator,
    El: Elections + ElectionsChannelRx,
{
    match event {
        ElectionEvent::StartElection => initiate_election(params),
        ElectionEvent::SeniorResponded(info) => process_senior_response(params, info),
        ElectionEvent::CoordinatorAnnounced(leader) => accept_coordinator(params, leader),
    }
}

fn initiate_election<Pc, El>(params: &ElectionManagerParams<Pc, El>)
where
    Pc: PeerCommunicator,
    El: Elections + ElectionsChannelRx,
{
    let election_round = {
        let mut peer = params.protected_peer.lock();
        if peer.status == ElectionState::InElection {
            debug!("Peer {} is already in election", peer.id);
            return;
        }

        let election_round = peer.begin_election();
        info!(
            "Peer {} started election round {} with {} senior peers",
            peer.id,
            election_round.round,
            election_round.seniors.len()
        );

        election_round
    };

    if election_round.seniors.is_empty() {
        become_leader(params);
        return;
    }

    for (senior, address) in election_round.seniors {
        common::run_worker_thread(
            contact_senior,
            ElectionAttemptParams {
                round: election_round.round,
                senior,
                address,
                group: election_round.group.clone(),
                peer_communicator: params.peer_communicator.clone(),
                elections: params.elections.clone(),
            },
        );
    }
}

fn process_senior_response<Pc, El>(params: &ElectionManagerParams<Pc, El>, info: SeniorResponseInfo)
where
    Pc: PeerCommunicator,
    El: Elections + ElectionsChannelRx,
{
    let decision = {
        let mut peer = params.protected_peer.lock();
        peer.record_response(info.round, info.response)
    };

    match decision {
        ReplyDecision::Ignore => trace!(
            "Ignored {:?} from peer {} for election round {}",
            info.response,
            info.senior,
            info.round
        ),
        ReplyDecision::KeepWaiting => debug!("Peer {} is unreachable", info.senior),
        ReplyDecision::AwaitWinner => {
            info!("Received OK from peer {}. Waiting for the coordinator", info.senior)
        }
        ReplyDecision::BecomeLeader => {
            info!("Every senior peer is unreachable");
            become_leader(params);
        }
    }
}

fn become_leader<Pc, El>(params: &ElectionManagerParams<Pc, El>)
where
    Pc: PeerCommunicator,
    El: Elections + ElectionsChannelRx,
{
    let leadership = {
        let mut peer = params.protected_peer.lock();
        let leadership = peer.become_leader();
        info!("Peer {} is the leader now", peer.id);

        leadership
    };

    common::run_worker_thread(
        announce_leadership,
        LeadershipAnnouncerParams {
            leadership,
            peer_communicator: params.peer_communicator.clone(),
        },
    );
}

fn accept_coordinator<Pc, El>(params: &ElectionManagerParams<Pc, El>, leader: PeerId)
where
    Pc: PeerCommunicator,
    El: Elections + ElectionsChannelRx,
{
    let mut peer = params.protected_peer.lock();
    peer.accept_coordinator(leader);

    info!("Peer {} accepted {} as the leader", peer.id, leader);
}
