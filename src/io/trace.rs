use std::io::{self, Write};

use crate::sim::perturb::{TraceEvent, TraceRecord};

pub const SEPARATOR: &str = " \t ";

/// Column header written after each perturbation banner.
pub fn column_header() -> String {
    ["#", "t", "axial", "lateral", "yaw", "pitch"].join(SEPARATOR)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// One trace line: time to 2 places, positions to 5, angles to 3.
pub fn format_record(r: &TraceRecord) -> String {
    [
        r.step_index.to_string(),
        format!("{:.2}", round_to(r.time, 2)),
        format!("{:.5}", round_to(r.axial, 5)),
        format!("{:.5}", round_to(r.lateral, 5)),
        format!("{:.3}", round_to(r.yaw, 3)),
        format!("{:.3}", round_to(r.pitch, 3)),
    ]
    .join(SEPARATOR)
}

/// Format one event as one or more lines (no trailing newline).
pub fn format_event(event: &TraceEvent) -> String {
    match event {
        TraceEvent::Armed { axis, delta } => {
            format!("## Post-perturbing {} by {}\n{}", axis.label(), delta, column_header())
        }
        TraceEvent::Record(r) => format_record(r),
    }
}

pub fn write_trace<W: Write>(writer: &mut W, events: &[TraceEvent]) -> io::Result<()> {
    for e in events {
        writeln!(writer, "{}", format_event(e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::perturb::PerturbationAxis;

    #[test]
    fn rounding_matches_fixed_places() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-0.0004, 3), -0.0);
        assert_eq!(round_to(0.123456789, 5), 0.12346);
    }

    #[test]
    fn record_line_has_fixed_precision() {
        let r = TraceRecord {
            step_index: 7,
            time: 0.123,
            axial: 0.0123456,
            lateral: -0.5,
            yaw: 0.00049,
            pitch: 0.1236,
        };
        assert_eq!(
            format_record(&r),
            "7 \t 0.12 \t 0.01235 \t -0.50000 \t 0.000 \t 0.124"
        );
    }

    #[test]
    fn armed_event_prints_banner_and_header() {
        let e = TraceEvent::Armed { axis: PerturbationAxis::LateralPos, delta: 0.05 };
        let text = format_event(&e);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "## Post-perturbing lateral position by 0.05");
        assert_eq!(lines[1], "# \t t \t axial \t lateral \t yaw \t pitch");
    }

    #[test]
    fn write_trace_one_line_per_record() {
        let r = TraceRecord { step_index: 1, time: 0.0, axial: 0.0, lateral: 0.0, yaw: 0.0, pitch: 0.0 };
        let events = vec![
            TraceEvent::Armed { axis: PerturbationAxis::Yaw, delta: 0.1 },
            TraceEvent::Record(r),
            TraceEvent::Record(TraceRecord { step_index: 2, ..r }),
        ];
        let mut buf = Vec::new();
        write_trace(&mut buf, &events).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 4);
    }
}
