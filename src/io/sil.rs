use std::io;
use std::net::UdpSocket;

use log::info;

use crate::io::csv::LogRecord;

// ---------------------------------------------------------------------------
// Software-in-the-loop telemetry (UDP, visualizer-compatible)
// ---------------------------------------------------------------------------

// The flight log is flown off the threshold of KSFO runway 28R.
pub const RUNWAY_LAT: f64 = 37.618817; // deg
pub const RUNWAY_LON: f64 = -122.375427; // deg

/// Flat-earth scale near the reference latitude, m per degree.
pub const METERS_PER_DEG: f64 = 111_000.0;

pub const FEET_PER_METER: f64 = 3.28084;

/// Added to the streamed altitude so the visualized aircraft clears
/// terrain around the reference airport.
pub const ALTITUDE_BUFFER_FT: f64 = 1000.0;

/// Runway 28R magnetic heading; the longitudinal model has no yaw state.
pub const FIXED_HEADING_DEG: f64 = 280.0;

pub const DEFAULT_ADDR: &str = "127.0.0.1:5500";

/// Format one log record as a telemetry datagram:
/// `lat,lon,alt_ft,roll_deg,pitch_deg,heading_deg\n`.
///
/// Northward distance maps onto latitude; longitude stays fixed at the
/// runway threshold.
pub fn packet(rec: &LogRecord) -> String {
    let lat = RUNWAY_LAT + rec.x_pos / METERS_PER_DEG;
    let alt_ft = rec.altitude * FEET_PER_METER + ALTITUDE_BUFFER_FT;
    format!(
        "{:.6},{:.6},{:.1},{:.2},{:.2},{:.1}\n",
        lat,
        RUNWAY_LON,
        alt_ft,
        rec.roll.to_degrees(),
        rec.pitch.to_degrees(),
        FIXED_HEADING_DEG,
    )
}

/// Stream a flight log over UDP, one datagram per record, paced by `dt`.
pub fn stream(records: &[LogRecord], addr: &str, dt: f64) -> io::Result<()> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    info!("streaming {} records to {addr} at {dt:.4} s intervals", records.len());
    for rec in records {
        socket.send_to(packet(rec).as_bytes(), addr)?;
        std::thread::sleep(std::time::Duration::from_secs_f64(dt));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
