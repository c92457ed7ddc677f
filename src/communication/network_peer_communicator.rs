use crate::communication::channel;
use crate::communication::connection_cache::ConnectionCache;
use crate::communication::messages::{Envelope, PeerMessage};
use crate::communication::{PeerCommunicator, PeerReply};
use crate::identity::{Address, Group, PeerId};
use crate::peer::configuration::PeerLimits;

/// TCP implementation of [`PeerCommunicator`]. Peers close a connection after one
/// message, so every exchange leases its own connection and evicts it when done.
#[derive(Clone, Debug)]
pub struct NetworkPeerCommunicator {
    peer_id: PeerId,
    limits: PeerLimits,
    connections: ConnectionCache,
}

impl NetworkPeerCommunicator {
    pub fn new(peer_id: PeerId, limits: PeerLimits) -> NetworkPeerCommunicator {
        let connections = ConnectionCache::new(limits.connect_timeout);

        NetworkPeerCommunicator {
            peer_id,
            limits,
            connections,
        }
    }

    pub fn connections(&self) -> &ConnectionCache {
        &self.connections
    }
}

impl PeerCommunicator for NetworkPeerCommunicator {
    fn request_election(&self, destination: PeerId, address: &Address, group: Group) -> PeerReply {
        let connection = self.connections.get_connection(destination, address);
        if connection.is_broken() {
            return PeerReply::Unreachable;
        }

        trace!("Destination Peer {}. Address ({}). Sending ELECTION", destination, address);

        let envelope = Envelope::new(self.peer_id, PeerMessage::Election { group });
        let reply = channel::request(&connection, &envelope, self.limits.receive_timeout, self.limits.max_message_size);

        if reply == PeerReply::Unreachable {
            connection.mark_broken();
        }
        self.connections.evict(&connection);

        reply
    }

    fn announce_coordinator(&self, destination: PeerId, address: &Address, group: Group) {
        let connection = self.connections.get_connection(destination, address);

        trace!("Destination Peer {}. Address ({}). Sending COORDINATOR", destination, address);

        let envelope = Envelope::new(self.peer_id, PeerMessage::Coordinator { group });
        if let Err(err) = channel::notify(&connection, &envelope, self.limits.max_message_size) {
            info!("Cannot announce leadership to peer {}: {}", destination, err);
            connection.mark_broken();
        }
        self.connections.evict(&connection);
    }

    fn mark_unreachable(&self, peer_id: PeerId) {
        self.connections.mark_broken(peer_id);
    }

    fn close_connection(&self, peer_id: PeerId) {
        self.connections.close_connection(peer_id);
    }
}
