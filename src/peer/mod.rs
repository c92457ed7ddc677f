use std::sync::Arc;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use crate::common::{self, Worker, WorkerPool};
use crate::communication::bootstrap;
use crate::communication::listener::{self, ListenerParams};
use crate::communication::PeerCommunicator;
use crate::election::administrator::{Elections, ElectionsAdministrator};
use crate::election::election_manager::{run_election_manager, ElectionManagerParams};
use crate::election::ElectionState;
use crate::errors::Result;
use crate::identity::{Address, Group, PeerId};

pub mod configuration;
pub mod state;

use configuration::PeerConfiguration;
use state::{PeerState, ProtectedPeer};

/// Read access to a running peer plus the manual election trigger.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    protected_peer: ProtectedPeer,
    elections: ElectionsAdministrator,
}

impl PeerHandle {
    pub fn peer_id(&self) -> PeerId {
        self.protected_peer.lock().id
    }

    pub fn address(&self) -> Address {
        self.protected_peer.lock().address.clone()
    }

    pub fn election_state(&self) -> ElectionState {
        self.protected_peer.lock().status
    }

    pub fn current_leader(&self) -> Option<PeerId> {
        self.protected_peer.lock().current_leader
    }

    pub fn group(&self) -> Group {
        self.protected_peer.lock().group().clone()
    }

    pub fn start_election(&self) {
        self.elections.start_election();
    }
}

#[derive(Debug)]
pub struct PeerWorker {
    worker: Worker,
    handle: PeerHandle,
}

impl PeerWorker {
    pub fn handle(&self) -> PeerHandle {
        self.handle.clone()
    }

    /// Stops the listener and the election manager and waits for them.
    pub fn terminate(self) {
        if self.worker.terminate_worker_tx.send(()).is_err() {
            error!("Cannot send termination signal to peer worker");
        }
        self.join();
    }

    pub fn join(self) {
        if self.worker.join_handle.join().is_err() {
            error!("Peer worker returned an error");
        }
    }
}

pub fn start<Pc: PeerCommunicator>(config: PeerConfiguration, peer_communicator: Pc) -> Result<PeerWorker> {
    let (tcp_listener, address) = listener::bind_listener(&config.host, &config.limits)?;
    info!("Peer {} listening on {}", config.peer_id, address);

    let protected_peer = Arc::new(Mutex::new(PeerState::new(config.peer_id, address.clone())));
    let elections = ElectionsAdministrator::new();

    let listener_worker = common::run_worker(
        "listener",
        listener::run_listener,
        ListenerParams {
            listener: tcp_listener,
            protected_peer: protected_peer.clone(),
            elections: elections.clone(),
            limits: config.limits.clone(),
        });

    let join_result = bootstrap::join_group(&config.bootstrap, config.peer_id, &address, &config.limits);
    let group = match join_result {
        Ok(group) => group,
        Err(err) => {
            let pool = WorkerPool::new(vec![listener_worker]);
            pool.terminate();
            pool.join();

            return Err(err);
        }
    };
    protected_peer.lock().merge_group(&group);
    debug!("Peer {} group: {:?}", config.peer_id, protected_peer.lock().group());

    let election_worker = common::run_worker(
        "election manager",
        run_election_manager,
        ElectionManagerParams {
            protected_peer: protected_peer.clone(),
            elections: elections.clone(),
            peer_communicator,
            winner_timeout: config.limits.winner_timeout,
        });

    elections.start_election();

    let worker_pool = WorkerPool::new(vec![listener_worker, election_worker]);
    let worker = common::run_worker("peer", supervise_workers, (config.peer_id, worker_pool));

    Ok(PeerWorker {
        worker,
        handle: PeerHandle { protected_peer, elections },
    })
}

fn supervise_workers(params: (PeerId, WorkerPool), terminate_worker_rx: Receiver<()>) {
    let (peer_id, worker_pool) = params;
    info!("Peer {} started", peer_id);

    let terminate_result = terminate_worker_rx.recv();
    if let Err(e) = terminate_result {
        error!("Abnormal exit for peer: {}", e);
    }

    info!("Peer {} termination requested", peer_id);

    worker_pool.terminate();
    worker_pool.join();

    info!("Peer {} shutting down", peer_id);
}
