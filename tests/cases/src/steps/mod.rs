use bully::{Address, PeerConfiguration, PeerId, PeerLimits};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

pub mod bootstrap;
pub mod cluster;
pub mod peer_communicator;

pub fn sleep_ms(milliseconds : u64) {
	thread::sleep(Duration::from_millis(milliseconds));
}

pub fn get_peer_limits() -> PeerLimits {
	PeerLimits {
		connect_timeout: Duration::from_millis(500),
		receive_timeout: Duration::from_millis(500),
		listen_port_range: 20000..=30000,
		join_retry_delay: Duration::from_millis(100),
		..PeerLimits::default()
	}
}

pub fn get_peer_configuration(peer_id : PeerId, bootstrap : &Address) -> PeerConfiguration {
	PeerConfiguration {
		limits: get_peer_limits(),
		..PeerConfiguration::new(peer_id, bootstrap.clone())
	}
}

/// Address nobody listens on.
pub fn get_dead_address() -> Address {
	let listener = TcpListener::bind("127.0.0.1:0").expect("can bind");
	let port = listener.local_addr().expect("has local address").port();

	Address::new("127.0.0.1", port)
}

pub fn wait_until<F : Fn() -> bool>(timeout : Duration, condition : F) -> bool {
	let deadline = Instant::now() + timeout;
	while Instant::now() < deadline {
		if condition() {
			return true
		}
		sleep_ms(20);
	}

	condition()
}
