use rayon::prelude::*;

use crate::communication::PeerCommunicator;
use crate::peer::state::Leadership;

pub struct LeadershipAnnouncerParams<Pc: PeerCommunicator> {
	pub leadership: Leadership,
	pub peer_communicator: Pc,
}

/// Broadcasts COORDINATOR to every other peer of the group. Each send drops any
/// cached connection first and expects no answer.
pub fn announce_leadership<Pc: PeerCommunicator>(params: LeadershipAnnouncerParams<Pc>) {
	let group = params.leadership.group;
	let peer_communicator = params.peer_communicator;

	params.leadership
		.others
		.into_par_iter()
		.for_each(|(peer_id, address)| {
			peer_communicator.close_connection(peer_id);
			peer_communicator.announce_coordinator(peer_id, &address, group.clone());
		});

	trace!("Leadership announced to {} peers", group.len().saturating_sub(1));
}
