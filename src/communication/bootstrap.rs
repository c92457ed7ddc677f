use std::net::TcpStream;
use std::thread;

use crate::communication::channel;
use crate::communication::messages::{Envelope, PeerMessage};
use crate::errors::{BullyError, Result};
use crate::identity::{Address, Group, PeerId};
use crate::peer::configuration::PeerLimits;

/// Sends JOIN with the own listening address to the bootstrap service and returns the
/// membership snapshot it answers with. Retries up to `limits.join_attempts` times.
pub fn join_group(bootstrap: &Address, peer_id: PeerId, own_address: &Address, limits: &PeerLimits) -> Result<Group> {
	let attempts = limits.join_attempts.max(1);
	let mut attempt = 1;

	loop {
		info!("Connecting to bootstrap service at {} (attempt {}/{})", bootstrap, attempt, attempts);

		match request_membership(bootstrap, peer_id, own_address, limits) {
			Ok(group) => {
				info!("Received the list of {} peers from the bootstrap service", group.len());
				return Ok(group);
			},
			Err(err) if attempt < attempts => {
				warn!("Join attempt {} failed: {}", attempt, err);
				thread::sleep(limits.join_retry_delay);
				attempt += 1;
			},
			Err(err) => {
				return Err(BullyError::Bootstrap { address: bootstrap.clone(), attempts, cause: Box::new(err) });
			},
		}
	}
}

fn request_membership(bootstrap: &Address, peer_id: PeerId, own_address: &Address, limits: &PeerLimits) -> Result<Group> {
	let socket_addr = bootstrap.socket_addr()?;
	let mut stream = TcpStream::connect_timeout(&socket_addr, limits.connect_timeout)?;
	stream.set_read_timeout(Some(limits.receive_timeout))?;
	stream.set_write_timeout(Some(limits.receive_timeout))?;

	let join = Envelope::new(peer_id, PeerMessage::Join { address: own_address.clone() });
	channel::send_frame(&mut stream, &join, limits.max_message_size)?;

	channel::receive_frame(&mut stream, limits.max_message_size)
}
