use lightsail_sim::io::trace;
use lightsail_sim::sail::SailConfig;
use lightsail_sim::sim::{PerturbationAxis, Simulation, TRACE_LENGTH};

fn main() {
    let mut sim = Simulation::new(SailConfig::default()).expect("default sail is valid");

    // Let the sail settle, then kick it sideways and print the trace.
    sim.run(100).expect("settling run");
    sim.apply_perturbation(PerturbationAxis::LateralPos, 0.01)
        .expect("finite perturbation");
    sim.run(TRACE_LENGTH as usize + 10).expect("traced run");

    for event in sim.drain_trace() {
        println!("{}", trace::format_event(&event));
    }
}
