use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use bully::{Address, Envelope, Group, PeerId, PeerMessage};

const MAX_FRAME_SIZE : usize = 64 * 1024;

/// Minimal rendezvous service: records every JOIN and answers with the membership
/// known so far, the joining peer included.
pub struct BootstrapService {
	pub address : Address,
	group : Arc<Mutex<Group>>,
	terminate_tx : Sender<()>,
	join_handle : JoinHandle<()>,
}

impl BootstrapService {
	pub fn start() -> BootstrapService {
		BootstrapService::start_with_group(Group::new())
	}

	pub fn start_with_group(group : Group) -> BootstrapService {
		let listener = TcpListener::bind("127.0.0.1:0").expect("can bind bootstrap service");
		listener.set_nonblocking(true).expect("can switch to non-blocking");
		let port = listener.local_addr().expect("has local address").port();

		let group = Arc::new(Mutex::new(group));
		let (terminate_tx, terminate_rx) = crossbeam_channel::unbounded();

		let shared_group = group.clone();
		let join_handle = thread::spawn(move || serve(listener, shared_group, terminate_rx));

		BootstrapService {
			address: Address::new("127.0.0.1", port),
			group,
			terminate_tx,
			join_handle,
		}
	}

	/// Registers a peer that never sends JOIN itself.
	pub fn register(&self, peer_id : PeerId, address : Address) {
		self.group.lock().insert(peer_id, address);
	}

	pub fn terminate(self) {
		self.terminate_tx.send(()).expect("can terminate bootstrap service");
		self.join_handle.join().expect("bootstrap service stopped");
	}
}

fn serve(listener : TcpListener, group : Arc<Mutex<Group>>, terminate_rx : Receiver<()>) {
	loop {
		match listener.accept() {
			Ok((stream, _)) => {
				if let Err(err) = answer_join(stream, &group) {
					error!("Bootstrap service error: {}", err);
				}
				continue
			}
			Err(ref err) if err.kind() == io::ErrorKind::WouldBlock => {}
			Err(err) => error!("Bootstrap accept error: {}", err),
		}

		if terminate_rx.recv_timeout(Duration::from_millis(20)).is_ok() {
			break
		}
	}
}

fn answer_join(mut stream : TcpStream, group : &Arc<Mutex<Group>>) -> bully::Result<()> {
	stream.set_nonblocking(false)?;
	stream.set_read_timeout(Some(Duration::from_secs(2)))?;

	let envelope : Envelope = bully::receive_envelope(&mut stream, MAX_FRAME_SIZE)?;
	let snapshot = {
		let mut group = group.lock();
		if let PeerMessage::Join { address } = envelope.message {
			info!("Bootstrap service: JOIN from {} at {}", envelope.sender, address);
			group.insert(envelope.sender, address);
		}

		group.clone()
	};

	bully::send_frame(&mut stream, &snapshot, MAX_FRAME_SIZE)
}
