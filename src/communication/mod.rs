use crate::identity::{Address, Group, PeerId};
use crate::communication::messages::Envelope;

pub mod bootstrap;
pub mod channel;
pub mod connection_cache;
pub mod listener;
pub mod messages;
pub mod network_peer_communicator;

/// Outcome of a request that expects an answer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PeerReply {
	Answered(Envelope),
	/// No usable reply arrived in time: connect refused, timeout and crashed peer
	/// are not distinguished.
	Unreachable,
}

/// Outbound side of the peer protocol used by the election engine.
pub trait PeerCommunicator: Clone + Send + Sync + 'static {
	/// Sends ELECTION with the membership snapshot and waits for the answer.
	fn request_election(&self, destination: PeerId, address: &Address, group: Group) -> PeerReply;

	/// Sends COORDINATOR without waiting for an answer.
	fn announce_coordinator(&self, destination: PeerId, address: &Address, group: Group);

	fn mark_unreachable(&self, peer_id: PeerId);

	fn close_connection(&self, peer_id: PeerId);
}
