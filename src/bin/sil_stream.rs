//! Replay a recorded flight log as UDP telemetry for an external
//! visualizer. Reads the CSV produced by the main simulator binary and
//! sends one datagram per row, paced at the log's own sample interval.

use std::env;
use std::io;
use std::process::ExitCode;

use log::{error, info};

use stol_sim::io::{csv, sil};

fn run() -> io::Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "flight_log.csv".to_string());
    let addr = args.next().unwrap_or_else(|| sil::DEFAULT_ADDR.to_string());

    let records = csv::read_log_file(&path)?;
    if records.len() < 2 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{path} holds fewer than 2 records, nothing to pace"),
        ));
    }
    let dt = records[1].time - records[0].time;
    info!("replaying {path} ({} records)", records.len());
    sil::stream(&records, &addr, dt)
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
