use crossbeam_channel::{Receiver, Sender};

use crate::election::{ElectionEvent, SeniorResponseInfo};
use crate::identity::PeerId;

pub trait Elections: Clone + Send + 'static {
    fn start_election(&self);
    fn senior_responded(&self, info: SeniorResponseInfo);
    fn coordinator_announced(&self, leader: PeerId);
}

pub trait ElectionsChannelRx {
    fn election_event_rx(&self) -> &Receiver<ElectionEvent>;
}

/// Queue feeding the election manager. Every state transition goes through it.
#[derive(Debug, Clone)]
pub struct ElectionsAdministrator {
    election_event_tx: Sender<ElectionEvent>,
    election_event_rx: Receiver<ElectionEvent>,
}

impl ElectionsAdministrator {
    pub fn new() -> ElectionsAdministrator {
        let (election_event_tx, election_event_rx): (
            Sender<ElectionEvent>,
            Receiver<ElectionEvent>,
        ) = crossbeam_channel::unbounded();

        ElectionsAdministrator {
            election_event_tx,
            election_event_rx,
        }
    }

    fn send(&self, event: ElectionEvent) {
        if self.election_event_tx.send(event).is_err() {
            error!("Cannot send election event");
        }
    }
}

impl Elections for ElectionsAdministrator {
    fn start_election(&self) {
        self.send(ElectionEvent::StartElection);
    }

    fn senior_responded(&self, info: SeniorResponseInfo) {
        self.send(ElectionEvent::SeniorResponded(info));
    }

    fn coordinator_announced(&self, leader: PeerId) {
        self.send(ElectionEvent::CoordinatorAnnounced(leader));
    }
}

impl ElectionsChannelRx for ElectionsAdministrator {
    fn election_event_rx(&self) -> &Receiver<ElectionEvent> {
        &self.election_event_rx
    }
}
