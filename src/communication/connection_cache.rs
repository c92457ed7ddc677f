use std::collections::HashMap;
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::errors::{BullyError, Result};
use crate::identity::{Address, PeerId};

/// Outbound connection to one peer. A connection is leased to a single exchange at
/// a time. A broken connection carries no socket and is never reused: the cache
/// replaces it on the next lookup.
#[derive(Debug)]
pub struct PeerConnection {
	peer_id: PeerId,
	stream: Mutex<Option<TcpStream>>,
	broken: AtomicBool,
	leased: AtomicBool,
}

pub type ConnectionHandle = Arc<PeerConnection>;

impl PeerConnection {
	fn connected(peer_id: PeerId, stream: TcpStream) -> PeerConnection {
		PeerConnection {
			peer_id,
			stream: Mutex::new(Some(stream)),
			broken: AtomicBool::new(false),
			leased: AtomicBool::new(true),
		}
	}

	fn broken(peer_id: PeerId) -> PeerConnection {
		PeerConnection {
			peer_id,
			stream: Mutex::new(None),
			broken: AtomicBool::new(true),
			leased: AtomicBool::new(true),
		}
	}

	pub fn peer_id(&self) -> PeerId {
		self.peer_id
	}

	pub fn is_broken(&self) -> bool {
		self.broken.load(Ordering::SeqCst)
	}

	pub fn is_leased(&self) -> bool {
		self.leased.load(Ordering::SeqCst)
	}

	fn try_lease(&self) -> bool {
		self.leased
			.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
			.is_ok()
	}

	pub fn mark_broken(&self) {
		self.broken.store(true, Ordering::SeqCst);
		self.close();
	}

	/// Runs `exchange` with exclusive access to the socket.
	pub fn with_stream<R, F>(&self, exchange: F) -> Result<R>
	where F: FnOnce(&mut TcpStream) -> Result<R> {
		let mut stream = self.stream.lock();

		match stream.as_mut() {
			Some(stream) if !self.is_broken() => exchange(stream),
			_ => Err(BullyError::NotConnected(self.peer_id)),
		}
	}

	fn close(&self) {
		if let Some(stream) = self.stream.lock().take() {
			if let Err(err) = stream.shutdown(Shutdown::Both) {
				trace!("Peer {} connection shutdown: {}", self.peer_id, err);
			}
		}
	}
}

type ConnectionSlot = Arc<Mutex<Option<ConnectionHandle>>>;

/// Lazily created outbound connections, one cached per peer. Creation, leasing and
/// eviction for a peer happen under that peer's slot lock; the map lock only guards
/// slot lookup.
#[derive(Clone, Debug)]
pub struct ConnectionCache {
	connect_timeout: Duration,
	slots: Arc<Mutex<HashMap<PeerId, ConnectionSlot>>>,
}

impl ConnectionCache {
	pub fn new(connect_timeout: Duration) -> ConnectionCache {
		ConnectionCache {
			connect_timeout,
			slots: Arc::new(Mutex::new(HashMap::new())),
		}
	}

	fn slot(&self, peer_id: PeerId) -> ConnectionSlot {
		self.slots
			.lock()
			.entry(peer_id)
			.or_insert_with(|| Arc::new(Mutex::new(None)))
			.clone()
	}

	fn existing_slot(&self, peer_id: PeerId) -> Option<ConnectionSlot> {
		self.slots.lock().get(&peer_id).cloned()
	}

	/// Leases the cached connection when it is healthy and idle, otherwise opens a
	/// new one and caches it. The returned handle belongs to the caller until
	/// [`ConnectionCache::release`] or [`ConnectionCache::evict`]. A failed connect
	/// yields a broken handle instead of an error.
	pub fn get_connection(&self, peer_id: PeerId, address: &Address) -> ConnectionHandle {
		let slot = self.slot(peer_id);
		let mut cached = slot.lock();

		if let Some(connection) = cached.as_ref() {
			if !connection.is_broken() && connection.try_lease() {
				return connection.clone();
			}
		}

		// a connection leased by another exchange stays with its holder
		let connection = Arc::new(self.connect(peer_id, address));
		*cached = Some(connection.clone());

		connection
	}

	fn connect(&self, peer_id: PeerId, address: &Address) -> PeerConnection {
		let connect_result = address
			.socket_addr()
			.and_then(|socket_addr| Ok(TcpStream::connect_timeout(&socket_addr, self.connect_timeout)?));

		match connect_result {
			Ok(stream) => {
				if let Err(err) = stream.set_nodelay(true) {
					trace!("Peer {} set_nodelay failed: {}", peer_id, err);
				}
				debug!("Connected to peer {} at {}", peer_id, address);
				PeerConnection::connected(peer_id, stream)
			}
			Err(err) => {
				info!("Cannot connect to peer {} at {}: {}", peer_id, address, err);
				PeerConnection::broken(peer_id)
			}
		}
	}

	/// Returns a leased connection to the cache for reuse. A broken connection or
	/// one no longer cached is closed instead.
	pub fn release(&self, connection: &ConnectionHandle) {
		let slot = self.existing_slot(connection.peer_id());
		let still_cached = match &slot {
			Some(slot) => {
				let cached = slot.lock();
				let same = matches!(cached.as_ref(), Some(current) if Arc::ptr_eq(current, connection));
				if same && !connection.is_broken() {
					connection.leased.store(false, Ordering::SeqCst);
				}
				same
			}
			None => false,
		};

		if !still_cached || connection.is_broken() {
			self.evict(connection);
		}
	}

	/// Closes a leased connection and drops it from the cache if it is still the
	/// cached one. Connections leased by other exchanges are left alone.
	pub fn evict(&self, connection: &ConnectionHandle) {
		if let Some(slot) = self.existing_slot(connection.peer_id()) {
			let mut cached = slot.lock();
			if matches!(cached.as_ref(), Some(current) if Arc::ptr_eq(current, connection)) {
				cached.take();
			}
		}

		connection.close();
		trace!("Peer {} connection closed", connection.peer_id());
	}

	/// Flags the idle cached connection to `peer_id` broken. A connection leased by
	/// a running exchange is not touched: its holder reports its own outcome.
	pub fn mark_broken(&self, peer_id: PeerId) {
		if let Some(slot) = self.existing_slot(peer_id) {
			if let Some(connection) = slot.lock().as_ref() {
				if !connection.is_leased() {
					connection.mark_broken();
				}
			}
		}
	}

	/// Evicts the connection to `peer_id`, closing it unless an exchange holds it.
	/// Does nothing if none is cached.
	pub fn close_connection(&self, peer_id: PeerId) {
		if let Some(slot) = self.existing_slot(peer_id) {
			if let Some(connection) = slot.lock().take() {
				if !connection.is_leased() {
					connection.close();
				}
				trace!("Peer {} connection evicted", peer_id);
			}
		}
	}

	pub fn is_cached(&self, peer_id: PeerId) -> bool {
		match self.existing_slot(peer_id) {
			Some(slot) => slot.lock().is_some(),
			None => false,
		}
	}
}
