use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use lightsail_sim::config::{Scenario, ScheduledPerturbation};
use lightsail_sim::io::json::{self, OscillationSummary};
use lightsail_sim::io::{csv, trace};
use lightsail_sim::sim::{self, Perturbation};

#[derive(Parser, Debug)]
#[command(version, about = "Headless light-sail dynamics run")]
struct Args {
    /// Scenario YAML file (defaults are used when omitted)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of steps, overriding the scenario
    #[arg(short = 'n', long)]
    steps: Option<usize>,

    /// Perturbation applied before the first step, as axis=delta (repeatable)
    #[arg(short, long = "perturb")]
    perturb: Vec<Perturbation>,

    /// Write the trajectory as CSV
    #[arg(long)]
    csv: Option<String>,

    /// Write the post-perturbation trace
    #[arg(long)]
    trace: Option<String>,

    /// Write a JSON summary
    #[arg(long)]
    summary: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => Scenario::default(),
    };
    if let Some(n) = args.steps {
        scenario.run.steps = n;
    }
    for p in &args.perturb {
        scenario.perturbations.push(ScheduledPerturbation {
            at_step: 0,
            axis: p.axis,
            delta: p.delta,
        });
    }

    info!("running {} steps", scenario.run.steps);
    let out = sim::simulate(&scenario)?;
    let d = &out.derived;
    let sail = &scenario.sail;

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  LIGHT-SAIL DYNAMICS");
    println!("====================================================================");
    println!();
    println!("  Sail Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Solid angle:   {:>8.3} pi    Mass:         {:>8.3} g",
        sail.solid_angle_fraction,
        sail.total_mass * 1e3
    );
    println!(
        "  CoM offset:    {:>8.3} m     Spin rate:    {:>8.3} rad/s",
        sail.center_of_mass_offset, sail.spin_rate
    );
    println!(
        "  Laser power:   {:>8.2} GW    Timestep:     {:>8.5} s",
        sail.laser_power / 1e9,
        sail.timestep
    );
    println!();
    println!("  Derived");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Scale factor:  {:>8.4}       Eff. radius:  {:>8.4} m",
        d.radius_scale_factor, d.effective_radius
    );
    println!(
        "  Rim radius:    {:>8.4} m     Cutoff:       {:>8.4} m",
        d.rim_radius, d.cutoff_distance
    );
    println!(
        "  F_rad:         {:>8.2} N     I / I3:       {:.3e} / {:.3e} kg m^2",
        d.radiation_force, d.inertia_transverse, d.inertia_axial
    );
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:>11}  {:>11}  {:>9}  {:>9}",
        "t (s)", "axial (m)", "lateral (m)", "yaw", "pitch"
    );
    println!("  {}", "─".repeat(58));

    let traj = &out.trajectory;
    let sample_interval = (traj.len() / 30).max(1);
    for (i, s) in traj.iter().enumerate() {
        if i % sample_interval != 0 && i != traj.len() - 1 {
            continue;
        }
        println!(
            "  {:>8.4}  {:>11.6}  {:>11.6}  {:>9.5}  {:>9.5}",
            s.time,
            s.axial(),
            s.lateral(),
            s.yaw(),
            s.pitch()
        );
    }

    let summary = OscillationSummary::from_trajectory(traj);
    println!();
    println!(
        "  Peaks: axial {:.5} m, lateral {:.5} m, yaw {:.4} rad, pitch {:.4} rad",
        summary.peak_axial, summary.peak_lateral, summary.peak_yaw, summary.peak_pitch
    );
    println!("  Simulation: {} steps, dt={} s", summary.steps, sail.timestep);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        csv::write_trajectory_file(path, traj).with_context(|| format!("writing {}", path))?;
        println!("Exported: {}", path);
    }
    if let Some(path) = &args.trace {
        let mut file = std::fs::File::create(path).with_context(|| format!("creating {}", path))?;
        trace::write_trace(&mut file, &out.trace)?;
        println!("Exported: {}", path);
    }
    if let Some(path) = &args.summary {
        json::write_summary_file(path, sail, d, &summary)?;
        println!("Exported: {}", path);
    }

    Ok(())
}
