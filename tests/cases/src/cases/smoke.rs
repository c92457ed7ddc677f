use std::time::Duration;

use bully::PeerId;

use crate::steps;

/// Three reachable peers: (5,200) must win and everybody must learn it.
pub fn run() {
    let peer_ids = vec![PeerId::new(5, 100), PeerId::new(5, 200), PeerId::new(3, 999)];
    let senior_most = PeerId::new(5, 200);

    let cluster = steps::cluster::start_initial_cluster(peer_ids, steps::cluster::create_network_peer);

    let elected = cluster.wait_for_leader(senior_most, Duration::from_secs(10));
    cluster.log_status();
    assert!(elected, "all peers must agree on {}", senior_most);

    // a fresh election from the junior peer changes nothing
    cluster.handle(PeerId::new(3, 999)).start_election();
    steps::sleep_ms(500);
    assert!(cluster.wait_for_leader(senior_most, Duration::from_secs(10)));

    for handle in cluster.handles.values() {
        assert_eq!(3, handle.group().len());
    }

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_smoke() {
        crate::cases::smoke::run()
    }
}
