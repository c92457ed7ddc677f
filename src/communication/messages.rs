use serde::{Deserialize, Serialize};

use crate::identity::{Address, Group, PeerId};

/// Closed set of protocol messages.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PeerMessage {
	/// Sent to the bootstrap service; carries the listening address of the sender.
	Join { address: Address },
	Election { group: Group },
	Ok,
	/// The sender of the envelope is the new leader.
	Coordinator { group: Group },
}

impl PeerMessage {
	pub fn name(&self) -> &'static str {
		match self {
			PeerMessage::Join { .. } => "JOIN",
			PeerMessage::Election { .. } => "ELECTION",
			PeerMessage::Ok => "OK",
			PeerMessage::Coordinator { .. } => "COORDINATOR",
		}
	}

	/// Membership snapshot carried by the message, if any.
	pub fn group(&self) -> Option<&Group> {
		match self {
			PeerMessage::Election { group } | PeerMessage::Coordinator { group } => Some(group),
			PeerMessage::Join { .. } | PeerMessage::Ok => None,
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
	pub sender: PeerId,
	pub message: PeerMessage,
}

impl Envelope {
	pub fn new(sender: PeerId, message: PeerMessage) -> Envelope {
		Envelope { sender, message }
	}
}
