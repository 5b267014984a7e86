use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dynamics::state::{State, AXIAL, LATERAL, PITCH, YAW};
use crate::error::{SailError, SailResult};

/// Number of steps recorded after each perturbation.
pub const TRACE_LENGTH: u32 = 200;

// ---------------------------------------------------------------------------
// Perturbation axes
// ---------------------------------------------------------------------------

/// State component a one-shot perturbation is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PerturbationAxis {
    AxialPos,
    LateralPos,
    Yaw,
    Pitch,
}

impl PerturbationAxis {
    pub const ALL: [PerturbationAxis; 4] = [
        PerturbationAxis::AxialPos,
        PerturbationAxis::LateralPos,
        PerturbationAxis::Yaw,
        PerturbationAxis::Pitch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PerturbationAxis::AxialPos => "axial-pos",
            PerturbationAxis::LateralPos => "lateral-pos",
            PerturbationAxis::Yaw => "yaw",
            PerturbationAxis::Pitch => "pitch",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerturbationAxis::AxialPos => "axial position",
            PerturbationAxis::LateralPos => "lateral position",
            PerturbationAxis::Yaw => "yaw angle",
            PerturbationAxis::Pitch => "pitch angle",
        }
    }

    /// Add `delta` to the matching component of `state`.
    pub fn apply(self, state: &mut State, delta: f64) {
        match self {
            PerturbationAxis::AxialPos => state.pos[AXIAL] += delta,
            PerturbationAxis::LateralPos => state.pos[LATERAL] += delta,
            PerturbationAxis::Yaw => state.angle[YAW] += delta,
            PerturbationAxis::Pitch => state.angle[PITCH] += delta,
        }
    }
}

impl fmt::Display for PerturbationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerturbationAxis {
    type Err = SailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        match key.as_str() {
            "axial-pos" | "axial" | "axialpos" => Ok(PerturbationAxis::AxialPos),
            "lateral-pos" | "lateral" | "lateralpos" => Ok(PerturbationAxis::LateralPos),
            "yaw" | "yaw-angle" | "yawangle" => Ok(PerturbationAxis::Yaw),
            "pitch" | "pitch-angle" | "pitchangle" => Ok(PerturbationAxis::Pitch),
            _ => Err(SailError::UnknownPerturbationAxis(s.to_string())),
        }
    }
}

impl TryFrom<String> for PerturbationAxis {
    type Error = SailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PerturbationAxis> for String {
    fn from(axis: PerturbationAxis) -> String {
        axis.as_str().to_string()
    }
}

/// A perturbation with its size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perturbation {
    pub axis: PerturbationAxis,
    pub delta: f64,
}

impl Perturbation {
    pub fn new(axis: PerturbationAxis, delta: f64) -> SailResult<Self> {
        if !delta.is_finite() {
            return Err(SailError::invalid(axis.as_str(), delta, "perturbation must be finite"));
        }
        Ok(Self { axis, delta })
    }
}

impl FromStr for Perturbation {
    type Err = SailError;

    /// Parses `axis=delta`, e.g. `lateral-pos=0.05`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (axis, delta) = s
            .split_once('=')
            .ok_or_else(|| SailError::UnknownPerturbationAxis(s.to_string()))?;
        let axis: PerturbationAxis = axis.parse()?;
        let delta: f64 = delta
            .trim()
            .parse()
            .map_err(|_| SailError::invalid(axis.as_str(), f64::NAN, "delta is not a number"))?;
        Perturbation::new(axis, delta)
    }
}

// ---------------------------------------------------------------------------
// Diagnostic trace
// ---------------------------------------------------------------------------

/// One post-perturbation sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRecord {
    pub step_index: u32, // 1..=TRACE_LENGTH
    pub time: f64,       // s, time at which the recorded step began
    pub axial: f64,      // m
    pub lateral: f64,    // m
    pub yaw: f64,        // rad
    pub pitch: f64,      // rad
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// A perturbation armed the trace.
    Armed { axis: PerturbationAxis, delta: f64 },
    Record(TraceRecord),
}

/// Countdown-driven recorder armed by perturbations.
///
/// Events wait in a bounded buffer until drained. A consumer that never
/// drains keeps only the most recent four traces' worth; older events are
/// dropped first.
#[derive(Debug, Clone)]
pub struct Trace {
    length: u32,
    remaining: u32,
    events: VecDeque<TraceEvent>,
}

impl Default for Trace {
    fn default() -> Self {
        Self::new(TRACE_LENGTH)
    }
}

impl Trace {
    pub fn new(length: u32) -> Self {
        Self { length, remaining: 0, events: VecDeque::new() }
    }

    /// Upper bound on buffered events.
    pub fn capacity(&self) -> usize {
        4 * (self.length as usize + 1)
    }

    fn push(&mut self, event: TraceEvent) {
        if self.events.len() == self.capacity() {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn is_armed(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Arm (or re-arm) for a full trace length.
    pub fn arm(&mut self, perturbation: Perturbation) {
        self.remaining = self.length;
        self.push(TraceEvent::Armed {
            axis: perturbation.axis,
            delta: perturbation.delta,
        });
    }

    /// Stop recording and discard everything buffered.
    pub fn clear(&mut self) {
        self.remaining = 0;
        self.events.clear();
    }

    /// Record the state after a step that began at `step_start`, if armed.
    pub fn record(&mut self, step_start: f64, state: &State) -> Option<TraceRecord> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let rec = TraceRecord {
            step_index: self.length - self.remaining,
            time: step_start,
            axial: state.axial(),
            lateral: state.lateral(),
            yaw: state.yaw(),
            pitch: state.pitch(),
        };
        self.push(TraceEvent::Record(rec));
        Some(rec)
    }

    /// Hand buffered events to the consumer.
    pub fn drain(&mut self) -> Vec<TraceEvent> {
        self.events.drain(..).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
