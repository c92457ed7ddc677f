#[macro_use] extern crate log;
extern crate env_logger;
extern crate chrono;

use std::io::Write;
use chrono::prelude::{DateTime, Local};

extern crate cases;

use cases::cases::{coordinator_override, late_joiner, partitioned_senior, single_peer,
    unreachable_senior, unreachable_seniors};

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            writeln!(buf, "{:5}: {} - {}", record.level(), now.format("%H:%M:%S.%3f").to_string(), record.args())
        })
        .init();
}

fn main() {
    init_logger();

    info!("Stand-alone Smoke test started");

    cases::smoke::run();
    single_peer::run();
    late_joiner::run();
    unreachable_senior::run();
    unreachable_seniors::run();
    partitioned_senior::run();
    coordinator_override::run();

    info!("Stand-alone Smoke test completed");
}
