use std::collections::HashSet;

use bully::{Address, Group, NetworkPeerCommunicator, PeerCommunicator, PeerId, PeerReply};

/// Network communicator that cannot reach the blocked peers, emulating a one-way
/// partition.
#[derive(Clone, Debug)]
pub struct PartitionedPeerCommunicator {
	inner : NetworkPeerCommunicator,
	blocked : HashSet<PeerId>,
}

impl PartitionedPeerCommunicator {
	pub fn new(inner : NetworkPeerCommunicator, blocked : Vec<PeerId>) -> PartitionedPeerCommunicator {
		PartitionedPeerCommunicator { inner, blocked: blocked.into_iter().collect() }
	}
}

impl PeerCommunicator for PartitionedPeerCommunicator {
	fn request_election(&self, destination : PeerId, address : &Address, group : Group) -> PeerReply {
		if self.blocked.contains(&destination) {
			trace!("Destination Peer {} blocked", destination);
			return PeerReply::Unreachable
		}

		self.inner.request_election(destination, address, group)
	}

	fn announce_coordinator(&self, destination : PeerId, address : &Address, group : Group) {
		if !self.blocked.contains(&destination) {
			self.inner.announce_coordinator(destination, address, group)
		}
	}

	fn mark_unreachable(&self, peer_id : PeerId) {
		self.inner.mark_unreachable(peer_id)
	}

	fn close_connection(&self, peer_id : PeerId) {
		self.inner.close_connection(peer_id)
	}
}
