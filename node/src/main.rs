#[macro_use] extern crate log;

use std::io::Write;
use std::process;

use chrono::prelude::{DateTime, Local};
use clap::Parser;

use bully::{Address, PeerConfiguration, PeerId};


/// Bully leader election peer.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Host of the bootstrap service.
    bootstrap_host: String,

    /// Port of the bootstrap service.
    bootstrap_port: u16,

    /// Primary priority of this peer.
    priority: u32,

    /// Tiebreak priority of this peer.
    tiebreak: u64,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            writeln!(buf, "{:5}: {} - {}", record.level(), now.format("%H:%M:%S.%3f"), record.args())
        })
        .init();
}

fn main() {
    let args = Args::parse();
    init_logger();

    let peer_id = PeerId::new(args.priority, args.tiebreak);
    let config = PeerConfiguration::new(peer_id, Address::new(args.bootstrap_host, args.bootstrap_port));

    let peer_worker = match bully::start_peer(config) {
        Ok(peer_worker) => peer_worker,
        Err(err) => {
            error!("Peer {} cannot start: {}", peer_id, err);
            process::exit(1);
        }
    };

    info!("Peer {} running", peer_id);

    peer_worker.join();
}
