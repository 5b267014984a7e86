use log::{info, trace, warn};

use super::integrator;
use super::perturb::{Perturbation, PerturbationAxis, Trace, TraceEvent, TRACE_LENGTH};
use crate::config::Scenario;
use crate::dynamics::state::State;
use crate::error::SailResult;
use crate::sail::{DerivedParams, ParamName, ParameterStore, SailConfig};

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Validate `config` and produce the first consistent state/derived pair.
pub fn initialize(config: &SailConfig) -> SailResult<(State, DerivedParams)> {
    config.validate()?;
    Ok((State::zeroed(), DerivedParams::derive(config)))
}

// ---------------------------------------------------------------------------
// Simulation: the single writer of parameters, state and trace
// ---------------------------------------------------------------------------

/// Owns one sail's parameters, dynamical state and diagnostic trace.
///
/// Every mutating method either fully applies or returns an error with
/// nothing changed.
#[derive(Debug, Clone)]
pub struct Simulation {
    store: ParameterStore,
    state: State,
    trace: Trace,
    steps: u64,
}

impl Simulation {
    pub fn new(config: SailConfig) -> SailResult<Self> {
        Self::with_trace_length(config, TRACE_LENGTH)
    }

    pub fn with_trace_length(config: SailConfig, trace_length: u32) -> SailResult<Self> {
        let (state, _) = initialize(&config)?;
        Ok(Self {
            store: ParameterStore::new(config)?,
            state,
            trace: Trace::new(trace_length),
            steps: 0,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &SailConfig {
        self.store.config()
    }

    pub fn derived(&self) -> DerivedParams {
        self.store.derived()
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    pub fn trace_armed(&self) -> bool {
        self.trace.is_armed()
    }

    pub fn set_parameter(&mut self, name: &str, value: f64) -> SailResult<()> {
        self.store.set_parameter(name, value)
    }

    pub fn set(&mut self, name: ParamName, value: f64) -> SailResult<()> {
        self.store.set(name, value)
    }

    /// Replace the whole configuration; the dynamical state is kept.
    pub fn reconfigure(&mut self, config: SailConfig) -> SailResult<()> {
        self.store.replace(config)
    }

    /// Advance one timestep. On error the previous state is retained.
    pub fn step(&mut self) -> SailResult<&State> {
        let config = self.store.config();
        let derived = self.store.derived();
        let next = integrator::step(&self.state, config, &derived).map_err(|e| {
            warn!("step {} refused: {}", self.steps + 1, e);
            e
        })?;

        let started = self.state.time;
        self.state = next;
        self.steps += 1;

        if let Some(rec) = self.trace.record(started, &self.state) {
            trace!(
                "{}\t{:.2}\t{:.5}\t{:.5}\t{:.3}\t{:.3}",
                rec.step_index, rec.time, rec.axial, rec.lateral, rec.yaw, rec.pitch
            );
        }
        Ok(&self.state)
    }

    /// Advance `n` steps, returning every new state.
    pub fn run(&mut self, n: usize) -> SailResult<Vec<State>> {
        let mut out = Vec::with_capacity(n.min(1_000_000));
        for _ in 0..n {
            out.push(*self.step()?);
        }
        Ok(out)
    }

    /// Add `delta` to one state component and arm the diagnostic trace.
    pub fn apply_perturbation(&mut self, axis: PerturbationAxis, delta: f64) -> SailResult<()> {
        let p = Perturbation::new(axis, delta)?;
        p.axis.apply(&mut self.state, p.delta);
        self.trace.arm(p);
        info!("perturbed {} by {} at t={:.3}s", axis.label(), delta, self.state.time);
        Ok(())
    }

    /// Same as `apply_perturbation`, with the axis given by name.
    pub fn perturb(&mut self, axis: &str, delta: f64) -> SailResult<()> {
        let axis: PerturbationAxis = axis.parse()?;
        self.apply_perturbation(axis, delta)
    }

    /// Zero the dynamical state and time, disarm the trace and drop any
    /// undrained trace events.
    pub fn reset(&mut self) -> State {
        self.state = State::zeroed();
        self.trace.clear();
        self.steps = 0;
        info!("simulation reset");
        self.state
    }

    pub fn drain_trace(&mut self) -> Vec<TraceEvent> {
        self.trace.drain()
    }
}

// ---------------------------------------------------------------------------
// Headless scenario run
// ---------------------------------------------------------------------------

/// Output of a scenario run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub trajectory: Vec<State>, // initial state first, then one entry per step
    pub trace: Vec<TraceEvent>,
    pub derived: DerivedParams,
}

/// Run a scenario from a zeroed state, applying each scheduled perturbation
/// before the step with the matching index.
pub fn simulate(scenario: &Scenario) -> SailResult<RunOutput> {
    scenario.validate()?;
    let mut sim = Simulation::new(scenario.sail.clone())?;

    let steps = scenario.run.steps;
    let mut trajectory = Vec::with_capacity(steps.min(1_000_000) + 1);
    trajectory.push(*sim.state());

    let mut trace = Vec::new();
    for i in 0..steps {
        for p in scenario.perturbations.iter().filter(|p| p.at_step == i) {
            sim.apply_perturbation(p.axis, p.delta)?;
        }
        trajectory.push(*sim.step()?);
        trace.append(&mut sim.drain_trace());
    }

    Ok(RunOutput {
        trajectory,
        trace,
        derived: sim.derived(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RunConfig, ScheduledPerturbation};
    use crate::error::SailError;
    use crate::sail::presets;

    fn records(events: &[TraceEvent]) -> usize {
        events.iter().filter(|e| matches!(e, TraceEvent::Record(_))).count()
    }

    #[test]
    fn reset_is_idempotent() {
        let mut sim = Simulation::new(SailConfig::default()).unwrap();
        sim.apply_perturbation(PerturbationAxis::LateralPos, 0.01).unwrap();
        sim.run(10).unwrap();
        let once = sim.reset();
        let twice = sim.reset();
        assert_eq!(once, State::zeroed());
        assert_eq!(once, twice);
        assert!(!sim.trace_armed());
        assert!(sim.drain_trace().is_empty());
        assert_eq!(sim.steps_taken(), 0);
    }

    #[test]
    fn trace_records_exactly_n_steps() {
        let mut sim = Simulation::new(SailConfig::default()).unwrap();
        sim.apply_perturbation(PerturbationAxis::Pitch, 1e-3).unwrap();
        sim.run(TRACE_LENGTH as usize).unwrap();
        assert!(!sim.trace_armed());
        let events = sim.drain_trace();
        assert_eq!(records(&events), TRACE_LENGTH as usize);

        // Step N+1 records nothing.
        sim.step().unwrap();
        assert!(sim.drain_trace().is_empty());
    }

    #[test]
    fn trace_record_carries_step_start_time() {
        let mut sim = Simulation::new(SailConfig::default()).unwrap();
        sim.run(3).unwrap();
        sim.apply_perturbation(PerturbationAxis::AxialPos, 0.01).unwrap();
        sim.step().unwrap();
        let events = sim.drain_trace();
        match events[1] {
            TraceEvent::Record(r) => {
                assert_eq!(r.step_index, 1);
                assert!((r.time - 3.0 * sim.config().timestep).abs() < 1e-15);
                assert_eq!(r.axial, sim.state().axial());
            }
            ref other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn refused_step_keeps_state() {
        let config = SailConfig { center_of_mass_offset: 0.0, ..SailConfig::default() };
        let mut sim = Simulation::new(config).unwrap();
        sim.apply_perturbation(PerturbationAxis::LateralPos, 0.1).unwrap();
        let before = *sim.state();
        assert!(matches!(sim.step(), Err(SailError::DegenerateStep { .. })));
        assert_eq!(*sim.state(), before);
        assert_eq!(sim.steps_taken(), 0);
    }

    #[test]
    fn rejected_parameter_keeps_everything() {
        let mut sim = Simulation::new(SailConfig::default()).unwrap();
        sim.run(5).unwrap();
        let state = *sim.state();
        let derived = sim.derived();
        assert!(sim.set_parameter("totalMass", 0.0).is_err());
        assert!(sim.set_parameter("solidAngleFraction", 2.0).is_err());
        assert!(sim.perturb("roll", 1.0).is_err());
        assert_eq!(*sim.state(), state);
        assert_eq!(sim.derived(), derived);
        assert!(!sim.trace_armed());
    }

    #[test]
    fn parameter_change_between_steps() {
        let mut sim = Simulation::new(SailConfig::default()).unwrap();
        sim.step().unwrap();
        sim.set_parameter("timestep", 0.002).unwrap();
        sim.step().unwrap();
        assert!((sim.state().time - 0.003).abs() < 1e-15);
    }

    #[test]
    fn initialize_validates() {
        let (s, d) = initialize(&SailConfig::default()).unwrap();
        assert_eq!(s, State::zeroed());
        assert!(d.radiation_force > 0.0);
        assert!(initialize(&SailConfig { timestep: -1.0, ..SailConfig::default() }).is_err());
    }

    #[test]
    fn scenario_applies_scheduled_perturbation() {
        let scenario = Scenario {
            sail: presets::shallow_cap(),
            run: RunConfig { steps: 300 },
            perturbations: vec![ScheduledPerturbation {
                at_step: 50,
                axis: PerturbationAxis::LateralPos,
                delta: 0.02,
            }],
        };
        let out = simulate(&scenario).unwrap();
        assert_eq!(out.trajectory.len(), 301);
        // Nothing moves before the kick.
        assert!(out.trajectory[..=50].iter().all(|s| s.lateral() == 0.0));
        assert!(out.trajectory[51].lateral() != 0.0);
        assert_eq!(records(&out.trace), TRACE_LENGTH as usize);
        assert!(out.trajectory.iter().all(|s| s.is_finite()));
    }
}
