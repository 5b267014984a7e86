use std::io::{self, Write};

use crate::dynamics::state::State;

/// Write trajectory data to CSV format.
///
/// Columns: time, axial, lateral, vel_axial, vel_lateral,
///          yaw, pitch, yaw_rate, pitch_rate
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[State]) -> io::Result<()> {
    writeln!(
        writer,
        "time,axial,lateral,vel_axial,vel_lateral,yaw,pitch,yaw_rate,pitch_rate"
    )?;

    for s in trajectory {
        writeln!(
            writer,
            "{:.6},{:.8},{:.8},{:.8},{:.8},{:.8},{:.8},{:.8},{:.8}",
            s.time,
            s.pos.x, s.pos.y,
            s.vel.x, s.vel.y,
            s.angle.x, s.angle.y,
            s.omega.x, s.omega.y,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, trajectory: &[State]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, trajectory)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn csv_output_has_header_and_rows() {
        let traj = vec![
            State::zeroed(),
            State {
                time: 0.001,
                pos: Vector2::new(0.01, -0.02),
                vel: Vector2::new(1.5, 0.0),
                angle: Vector2::new(0.003, 0.0),
                omega: Vector2::zeros(),
            },
        ];

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,axial,lateral"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.000000,"));
        assert!(lines[2].starts_with("0.001000,0.01000000,-0.02000000,1.50000000"));
        assert_eq!(lines[2].split(',').count(), 9);
    }
}
