use std::time::Duration;

use bully::{ElectionState, PeerId, PeerMessage};

use crate::steps;
use crate::steps::bootstrap::BootstrapService;
use crate::steps::stub_peer::StubPeer;

/// (5,200) is down, (5,100) answers OK but never announces itself: (3,999) must
/// contact the next senior and wait for a winner instead of electing itself.
pub fn run() {
    let bootstrap = BootstrapService::start();
    bootstrap.register(PeerId::new(5, 200), steps::get_dead_address());

    let next_senior = StubPeer::start(PeerId::new(5, 100));
    bootstrap.register(next_senior.id, next_senior.address.clone());

    let junior_id = PeerId::new(3, 999);
    let junior = bully::start_peer(steps::get_peer_configuration(junior_id, &bootstrap.address)).expect("can start peer");
    let handle = junior.handle();

    let awaiting = steps::wait_until(Duration::from_secs(5), || handle.election_state() == ElectionState::AwaitingWinner);
    assert!(awaiting);

    let elections_received = next_senior
        .received()
        .iter()
        .filter(|envelope| envelope.sender == junior_id && matches!(envelope.message, PeerMessage::Election { .. }))
        .count();
    assert_eq!(1, elections_received);

    // long enough for the dead senior's attempt to time out
    steps::sleep_ms(1000);
    assert_eq!(ElectionState::AwaitingWinner, handle.election_state());
    assert_eq!(None, handle.current_leader());

    junior.terminate();
    next_senior.terminate();
    bootstrap.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_unreachable_senior() {
        crate::cases::unreachable_senior::run()
    }
}
