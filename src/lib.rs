#![warn(missing_debug_implementations, unsafe_code)]

#[macro_use] extern crate log;
#[macro_use] extern crate crossbeam_channel;


mod common;
mod communication;
mod election;
mod errors;
mod identity;
mod peer;


pub use identity::{PeerId, Address, Group, higher_priority};
pub use communication::{PeerCommunicator, PeerReply};
pub use communication::messages::{Envelope, PeerMessage};
pub use communication::channel::{notify, request, send_frame, receive_frame, receive_envelope};
pub use communication::connection_cache::{ConnectionCache, ConnectionHandle, PeerConnection};
pub use communication::network_peer_communicator::NetworkPeerCommunicator;
pub use communication::bootstrap::join_group;
pub use election::ElectionState;
pub use peer::configuration::{PeerConfiguration, PeerLimits};
pub use peer::{PeerHandle, PeerWorker};
pub use errors::{BullyError, Result};


/// Binds the listener, joins the group through the bootstrap service and starts the
/// election workers. Fails only on startup problems: the bind or the JOIN round trip.
pub fn start_peer(config: PeerConfiguration) -> Result<PeerWorker> {
	let limits = config.limits.clone();
	let communicator = NetworkPeerCommunicator::new(config.peer_id, limits);

	peer::start(config, communicator)
}

/// Same as [`start_peer`] with a caller-provided transport for outbound requests.
pub fn start_peer_with_communicator<Pc>(config: PeerConfiguration, communicator: Pc) -> Result<PeerWorker>
where Pc: PeerCommunicator {
	peer::start(config, communicator)
}
