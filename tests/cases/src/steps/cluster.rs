use std::collections::BTreeMap;
use std::time::Duration;

use bully::{ElectionState, PeerHandle, PeerId, PeerWorker};

use super::bootstrap::BootstrapService;

pub struct CaseCluster {
	pub bootstrap : BootstrapService,
	pub peer_workers : Vec<PeerWorker>,
	pub handles : BTreeMap<PeerId, PeerHandle>,
}

pub fn start_initial_cluster<F>(peers : Vec<PeerId>, peer_creator : F) -> CaseCluster
where F : Fn(PeerId, &BootstrapService) -> PeerWorker {
	let bootstrap = BootstrapService::start();
	let mut cluster = CaseCluster {
		bootstrap,
		peer_workers : Vec::new(),
		handles : BTreeMap::new(),
	};

	for peer_id in peers {
		cluster.add_new_peer(peer_id, &peer_creator);
	}

	cluster
}

pub fn create_network_peer(peer_id : PeerId, bootstrap : &BootstrapService) -> PeerWorker {
	let config = super::get_peer_configuration(peer_id, &bootstrap.address);

	bully::start_peer(config).expect("can start peer")
}

impl CaseCluster {
	pub fn add_new_peer<F>(&mut self, peer_id : PeerId, peer_creator : F)
	where F : Fn(PeerId, &BootstrapService) -> PeerWorker {
		let peer_worker = peer_creator(peer_id, &self.bootstrap);

		self.handles.insert(peer_id, peer_worker.handle());
		self.peer_workers.push(peer_worker);
	}

	pub fn handle(&self, peer_id : PeerId) -> &PeerHandle {
		&self.handles[&peer_id]
	}

	/// Waits until every peer is idle and agrees on `leader`.
	pub fn wait_for_leader(&self, leader : PeerId, timeout : Duration) -> bool {
		super::wait_until(timeout, || {
			self.handles.values().all(|handle| {
				handle.current_leader() == Some(leader) && handle.election_state() == ElectionState::Initial
			})
		})
	}

	pub fn log_status(&self) {
		for (peer_id, handle) in &self.handles {
			info!("--Peer {}: state {:?}, leader {:?}", peer_id, handle.election_state(), handle.current_leader());
		}
	}

	pub fn terminate(self) {
		for peer_worker in self.peer_workers {
			peer_worker.terminate();
		}

		self.bootstrap.terminate();
	}
}
