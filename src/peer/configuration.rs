use std::ops::RangeInclusive;
use std::time::Duration;

use crate::identity::{Address, PeerId};


#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PeerLimits {
    pub connect_timeout: Duration,
    pub receive_timeout: Duration,
    pub max_message_size: usize,
    pub listen_port_range: RangeInclusive<u16>,
    pub bind_attempts: u32,
    pub join_attempts: u32,
    pub join_retry_delay: Duration,
    /// Re-election delay for a peer stuck waiting for a COORDINATOR. `None` waits forever.
    pub winner_timeout: Option<Duration>,
    pub accept_poll_interval: Duration,
}

impl Default for PeerLimits {
    fn default() -> Self {
        PeerLimits {
            connect_timeout: Duration::from_millis(2500),
            receive_timeout: Duration::from_millis(2500),
            max_message_size: 64 * 1024, //64 KB
            listen_port_range: 1025..=2026,
            bind_attempts: 16,
            join_attempts: 3,
            join_retry_delay: Duration::from_secs(1),
            winner_timeout: None,
            accept_poll_interval: Duration::from_millis(50),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PeerConfiguration {
    pub peer_id: PeerId,
    /// Host the listener binds to and advertises to the group.
    pub host: String,
    pub bootstrap: Address,
    pub limits: PeerLimits,
}

impl PeerConfiguration {
    pub fn new(peer_id: PeerId, bootstrap: Address) -> PeerConfiguration {
        PeerConfiguration {
            peer_id,
            host: "127.0.0.1".to_string(),
            bootstrap,
            limits: PeerLimits::default(),
        }
    }
}
