use std::io::Write;

use serde::Serialize;

use crate::dynamics::state::State;
use crate::error::SailResult;
use crate::sail::{DerivedParams, SailConfig};

/// Peak excursions over a trajectory.
#[derive(Debug, Clone, Serialize)]
pub struct OscillationSummary {
    pub steps: usize,
    pub final_time: f64,
    pub peak_axial: f64,
    pub peak_lateral: f64,
    pub peak_yaw: f64,
    pub peak_pitch: f64,
    pub final_state: State,
}

impl OscillationSummary {
    /// Compute summary from trajectory data. An empty trajectory gives a
    /// zeroed summary.
    pub fn from_trajectory(trajectory: &[State]) -> Self {
        let peak = |f: fn(&State) -> f64| {
            trajectory.iter().map(|s| f(s).abs()).fold(0.0_f64, f64::max)
        };
        let last = trajectory.last().copied().unwrap_or_default();

        OscillationSummary {
            steps: trajectory.len().saturating_sub(1),
            final_time: last.time,
            peak_axial: peak(State::axial),
            peak_lateral: peak(State::lateral),
            peak_yaw: peak(State::yaw),
            peak_pitch: peak(State::pitch),
            final_state: last,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    sail: &'a SailConfig,
    derived: &'a DerivedParams,
    summary: &'a OscillationSummary,
}

/// Write configuration, derived parameters and summary as pretty JSON.
pub fn write_summary<W: Write>(
    writer: &mut W,
    sail: &SailConfig,
    derived: &DerivedParams,
    summary: &OscillationSummary,
) -> SailResult<()> {
    let report = Report { sail, derived, summary };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the summary JSON to a file.
pub fn write_summary_file(
    path: &str,
    sail: &SailConfig,
    derived: &DerivedParams,
    summary: &OscillationSummary,
) -> SailResult<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, sail, derived, summary)
}
