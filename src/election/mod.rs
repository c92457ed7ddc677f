use crate::identity::PeerId;

pub mod administrator;
pub mod election_attempt;
pub mod election_manager;
pub mod leadership_announcer;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElectionState {
	/// No election running.
	Initial,
	/// ELECTION sent to the seniors, waiting for their answers.
	InElection,
	/// A senior answered OK, waiting for its COORDINATOR.
	AwaitingWinner,
}

/// What a senior peer's answer to ELECTION amounts to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SeniorResponse {
	Ok,
	Unreachable,
}

pub enum ElectionEvent {
	StartElection,
	SeniorResponded(SeniorResponseInfo),
	CoordinatorAnnounced(PeerId),
}

pub struct SeniorResponseInfo {
	pub round: u64,
	pub senior: PeerId,
	pub response: SeniorResponse,
}
