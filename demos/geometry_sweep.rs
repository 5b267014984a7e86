use lightsail_sim::sail::{ParameterStore, SailConfig};

fn main() {
    let mut store = ParameterStore::new(SailConfig::default()).expect("default sail is valid");

    println!(
        "{:>8}  {:>8}  {:>9}  {:>9}  {:>9}  {:>10}",
        "angle", "scale", "cutoff", "R (m)", "a (m)", "F_rad (N)"
    );
    for i in 1..=10 {
        let fraction = i as f64 / 10.0;
        store
            .set_parameter("solidAngleFraction", fraction)
            .expect("fraction in (0, 1]");
        let d = store.derived();
        println!(
            "{:>6.1}pi  {:>8.4}  {:>9.4}  {:>9.4}  {:>9.4}  {:>10.2}",
            fraction,
            d.radius_scale_factor,
            d.cutoff_distance,
            d.effective_radius,
            d.rim_radius,
            d.radiation_force
        );
    }
}
