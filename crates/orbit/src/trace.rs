//! Headless frame driver: runs the engine against a synthetic clock and
//! prints every frame, with no daemon or socket involved.

use carousel::RingEngine;
use std::io::{self, Write};
use std::time::{Duration, Instant};

pub fn run_trace(
    mut engine: RingEngine,
    seconds: f64,
    frame_rate: u32,
    out: &mut impl Write,
) -> io::Result<()> {
    if !seconds.is_finite() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("trace length must be finite, got {}", seconds),
        ));
    }
    let frame_rate = frame_rate.max(1);
    let frames = (seconds.max(0.0) * f64::from(frame_rate)).round() as u64;
    let start = Instant::now();

    for n in 0..=frames {
        let t = n as f64 / f64::from(frame_rate);
        write!(out, "{:.3}", t)?;
        for p in engine.positions() {
            write!(out, " {:.2},{:.2}", p.x, p.y)?;
        }
        writeln!(out)?;
        engine.advance(start + Duration::from_secs_f64(t));
    }
    Ok(())
}
