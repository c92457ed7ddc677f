use std::collections::BTreeMap;
use std::net::{SocketAddr, ToSocketAddrs};

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::errors::{BullyError, Result};

/// Priority key of a peer. Peers compare by `primary` first and by `tiebreak` on
/// equality; the greater key is the more senior peer.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[display(fmt = "({}, {})", primary, tiebreak)]
pub struct PeerId {
	pub primary: u32,
	pub tiebreak: u64,
}

impl PeerId {
	pub fn new(primary: u32, tiebreak: u64) -> PeerId {
		PeerId { primary, tiebreak }
	}

	pub fn is_senior_to(&self, other: &PeerId) -> bool {
		higher_priority(self, other)
	}
}

/// Returns true if `a` should bully `b`.
pub fn higher_priority(a: &PeerId, b: &PeerId) -> bool {
	a.primary > b.primary || (a.primary == b.primary && a.tiebreak > b.tiebreak)
}

#[derive(Clone, Debug, Display, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[display(fmt = "{}:{}", host, port)]
pub struct Address {
	pub host: String,
	pub port: u16,
}

impl Address {
	pub fn new<H: Into<String>>(host: H, port: u16) -> Address {
		Address { host: host.into(), port }
	}

	pub fn socket_addr(&self) -> Result<SocketAddr> {
		let mut resolved = (self.host.as_str(), self.port).to_socket_addrs()?;

		resolved.next().ok_or_else(|| BullyError::UnresolvedAddress(self.clone()))
	}
}

/// Known membership. Merges are unions; entries are never removed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
	members: BTreeMap<PeerId, Address>,
}

impl Group {
	pub fn new() -> Group {
		Group::default()
	}

	pub fn insert(&mut self, peer_id: PeerId, address: Address) {
		self.members.insert(peer_id, address);
	}

	/// Adds every member of `other`. An address already known for a peer is
	/// replaced by the one in `other`.
	pub fn merge(&mut self, other: &Group) {
		for (peer_id, address) in other.iter() {
			self.members.insert(*peer_id, address.clone());
		}
	}

	pub fn address(&self, peer_id: &PeerId) -> Option<&Address> {
		self.members.get(peer_id)
	}

	pub fn contains(&self, peer_id: &PeerId) -> bool {
		self.members.contains_key(peer_id)
	}

	pub fn len(&self) -> usize {
		self.members.len()
	}

	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&PeerId, &Address)> {
		self.members.iter()
	}

	/// Members strictly senior to `peer_id`.
	pub fn seniors_of(&self, peer_id: &PeerId) -> Vec<(PeerId, Address)> {
		self.members
			.iter()
			.filter(|(id, _)| higher_priority(id, peer_id))
			.map(|(id, address)| (*id, address.clone()))
			.collect()
	}

	/// Every member except `peer_id`.
	pub fn others(&self, peer_id: &PeerId) -> Vec<(PeerId, Address)> {
		self.members
			.iter()
			.filter(|(id, _)| *id != peer_id)
			.map(|(id, address)| (*id, address.clone()))
			.collect()
	}
}
