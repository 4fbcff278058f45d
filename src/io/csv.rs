use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::dynamics::state::State;

// ---------------------------------------------------------------------------
// Flight log CSV (write side)
// ---------------------------------------------------------------------------

const HEADER: &str = "Time,X_Pos,Altitude,Velocity,Pitch,Roll";

/// Write a trajectory as CSV to any sink. One row per sampled state;
/// velocity is the forward body component, angles are radians, altitude
/// is height above the NED origin.
pub fn write_log<W: Write>(mut out: W, trajectory: &[State]) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    for s in trajectory {
        writeln!(
            out,
            "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            s.time,
            s.pos.x,
            s.altitude(),
            s.vel.x,
            s.att.y,
            s.att.x,
        )?;
    }
    Ok(())
}

/// Write a trajectory to a CSV file on disk.
pub fn write_log_file<P: AsRef<Path>>(path: P, trajectory: &[State]) -> io::Result<()> {
    let file = File::create(path.as_ref())?;
    write_log(BufWriter::new(file), trajectory)?;
    info!(
        "wrote {} samples to {}",
        trajectory.len(),
        path.as_ref().display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Flight log CSV (read side, for replay)
// ---------------------------------------------------------------------------

/// One row of a flight log, as read back for replay or streaming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    pub time: f64,      // s
    pub x_pos: f64,     // m north of the origin
    pub altitude: f64,  // m above the origin
    pub velocity: f64,  // m/s, forward body component
    pub pitch: f64,     // rad
    pub roll: f64,      // rad
}

/// Parse a flight log from any reader. The header row is required;
/// malformed rows fail with `InvalidData`.
pub fn read_log<R: BufRead>(input: R) -> io::Result<Vec<LogRecord>> {
    let mut lines = input.lines();
    match lines.next().transpose()? {
        Some(header) if header.trim() == HEADER => {}
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "missing or unrecognized flight log header",
            ))
        }
    }

    let mut records = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<f64> = line
            .split(',')
            .map(|f| f.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("bad value on row {}: {e}", idx + 2),
                )
            })?;
        if fields.len() != 6 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected 6 fields on row {}, got {}", idx + 2, fields.len()),
            ));
        }
        records.push(LogRecord {
            time: fields[0],
            x_pos: fields[1],
            altitude: fields[2],
            velocity: fields[3],
            pitch: fields[4],
            roll: fields[5],
        });
    }
    Ok(records)
}

/// Read a flight log from a CSV file on disk.
pub fn read_log_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<LogRecord>> {
    read_log(BufReader::new(File::open(path)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
