use std::io;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};

use crossbeam_channel::Receiver;
use rand::Rng;

use crate::common;
use crate::communication::channel;
use crate::communication::messages::{Envelope, PeerMessage};
use crate::election::administrator::Elections;
use crate::election::ElectionState;
use crate::errors::{BullyError, Result};
use crate::identity::Address;
use crate::peer::configuration::PeerLimits;
use crate::peer::state::ProtectedPeer;

/// Binds `host` on a random port of `limits.listen_port_range`, trying another port
/// when the chosen one is taken.
pub fn bind_listener(host: &str, limits: &PeerLimits) -> Result<(TcpListener, Address)> {
	if limits.listen_port_range.is_empty() {
		let cause = io::Error::new(io::ErrorKind::InvalidInput, "empty listening port range");
		return Err(BullyError::Bind { host: host.to_string(), attempts: 0, cause });
	}

	let mut rng = rand::thread_rng();
	let mut last_error = io::Error::new(io::ErrorKind::Other, "no bind attempts configured");

	for _ in 0..limits.bind_attempts {
		let port = rng.gen_range(limits.listen_port_range.clone());

		match TcpListener::bind((host, port)) {
			Ok(listener) => return Ok((listener, Address::new(host, port))),
			Err(err) => {
				debug!("Cannot bind {}:{}: {}", host, port, err);
				last_error = err;
			}
		}
	}

	Err(BullyError::Bind { host: host.to_string(), attempts: limits.bind_attempts, cause: last_error })
}

pub struct ListenerParams<El: Elections> {
	pub listener: TcpListener,
	pub protected_peer: ProtectedPeer,
	pub elections: El,
	pub limits: PeerLimits,
}

struct IncomingPeerParams<El: Elections> {
	stream: TcpStream,
	remote: SocketAddr,
	protected_peer: ProtectedPeer,
	elections: El,
	limits: PeerLimits,
}

/// Accepts inbound connections until terminated; every connection is served by its
/// own thread.
pub fn run_listener<El: Elections>(params: ListenerParams<El>, terminate_worker_rx: Receiver<()>) {
	if let Err(err) = params.listener.set_nonblocking(true) {
		error!("Cannot switch listener to non-blocking mode: {}", err);
		return;
	}

	info!("Listener worker started on {:?}", params.listener.local_addr());
	loop {
		match params.listener.accept() {
			Ok((stream, remote)) => {
				trace!("Accepted connection from {}", remote);
				common::run_worker_thread(handle_incoming_peer, IncomingPeerParams {
					stream,
					remote,
					protected_peer: params.protected_peer.clone(),
					elections: params.elections.clone(),
					limits: params.limits.clone(),
				});
				continue;
			},
			Err(ref err) if err.kind() == io::ErrorKind::WouldBlock => {},
			Err(err) => error!("Accept error: {}", err),
		}

		select!(
			recv(terminate_worker_rx) -> res  => {
				if res.is_err() {
					error!("Abnormal exit for listener worker");
				}
				break
			},
			recv(crossbeam_channel::after(params.limits.accept_poll_interval)) -> _ => {}
		);
	}
	info!("Listener worker stopped");
}

fn handle_incoming_peer<El: Elections>(mut params: IncomingPeerParams<El>) {
	if let Err(err) = prepare_stream(&params.stream, &params.limits) {
		warn!("Cannot configure connection from {}: {}", params.remote, err);
		return;
	}

	match channel::receive_envelope(&mut params.stream, params.limits.max_message_size) {
		Ok(envelope) => process_envelope(&mut params, envelope),
		Err(err) => warn!("Dropped malformed message from {}: {}", params.remote, err),
	}

	if let Err(err) = params.stream.shutdown(Shutdown::Both) {
		trace!("Connection from {} shutdown: {}", params.remote, err);
	}
}

fn prepare_stream(stream: &TcpStream, limits: &PeerLimits) -> Result<()> {
	stream.set_nonblocking(false)?;
	stream.set_read_timeout(Some(limits.receive_timeout))?;
	stream.set_write_timeout(Some(limits.receive_timeout))?;

	Ok(())
}

fn process_envelope<El: Elections>(params: &mut IncomingPeerParams<El>, envelope: Envelope) {
	let (own_id, status) = {
		let mut peer = params.protected_peer.lock();
		if let Some(group) = envelope.message.group() {
			peer.merge_group(group);
		}

		(peer.id, peer.status)
	};

	match envelope.message {
		PeerMessage::Election { .. } => {
			info!("ELECTION message from peer {}. Sending OK", envelope.sender);

			let ok = Envelope::new(own_id, PeerMessage::Ok);
			if let Err(err) = channel::send_frame(&mut params.stream, &ok, params.limits.max_message_size) {
				warn!("Cannot send OK to peer {}: {}", envelope.sender, err);
			}

			if status != ElectionState::InElection {
				params.elections.start_election();
			}
		},
		PeerMessage::Coordinator { .. } => {
			info!("COORDINATOR message from peer {}", envelope.sender);
			params.elections.coordinator_announced(envelope.sender);
		},
		PeerMessage::Join { .. } | PeerMessage::Ok => {
			warn!("Unexpected {} message from peer {}", envelope.message.name(), envelope.sender);
		},
	}
}
