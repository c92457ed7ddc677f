use std::time::Duration;

use bully::PeerId;

use crate::steps;

/// Every senior of (3,999) is down: it elects itself and the junior peer follows.
pub fn run() {
    let mut cluster = steps::cluster::start_initial_cluster(vec![PeerId::new(1, 1)], steps::cluster::create_network_peer);
    cluster.bootstrap.register(PeerId::new(5, 100), steps::get_dead_address());
    cluster.bootstrap.register(PeerId::new(5, 200), steps::get_dead_address());

    cluster.add_new_peer(PeerId::new(3, 999), steps::cluster::create_network_peer);

    let elected = cluster.wait_for_leader(PeerId::new(3, 999), Duration::from_secs(10));
    cluster.log_status();
    assert!(elected);

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_unreachable_seniors() {
        crate::cases::unreachable_seniors::run()
    }
}
