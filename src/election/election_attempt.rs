use crate::communication::messages::PeerMessage;
use crate::communication::{PeerCommunicator, PeerReply};
use crate::election::administrator::Elections;
use crate::election::{SeniorResponse, SeniorResponseInfo};
use crate::identity::{Address, Group, PeerId};

pub struct ElectionAttemptParams<Pc, El>
where
	Pc: PeerCommunicator,
	El: Elections,
{
	pub round: u64,
	pub senior: PeerId,
	pub address: Address,
	pub group: Group,
	pub peer_communicator: Pc,
	pub elections: El,
}

/// Asks one senior peer to run the election and reports its answer. Runs on its
/// own thread until the request completes or times out.
pub fn contact_senior<Pc, El>(params: ElectionAttemptParams<Pc, El>)
where
	Pc: PeerCommunicator,
	El: Elections,
{
	let reply = params
		.peer_communicator
		.request_election(params.senior, &params.address, params.group);

	let response = match reply {
		PeerReply::Answered(envelope) => match envelope.message {
			PeerMessage::Ok => {
				debug!("Received OK from peer {}", params.senior);
				SeniorResponse::Ok
			}
			other => {
				warn!("Unexpected {} answer to ELECTION from peer {}", other.name(), params.senior);
				SeniorResponse::Unreachable
			}
		},
		PeerReply::Unreachable => SeniorResponse::Unreachable,
	};

	if response == SeniorResponse::Unreachable {
		params.peer_communicator.mark_unreachable(params.senior);
	}

	params.elections.senior_responded(SeniorResponseInfo {
		round: params.round,
		senior: params.senior,
		response,
	});
}
