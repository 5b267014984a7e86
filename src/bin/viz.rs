use std::collections::VecDeque;

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use log::warn;

use lightsail_sim::dynamics::state::State;
use lightsail_sim::io::trace;
use lightsail_sim::sail::{ParamName, SailConfig};
use lightsail_sim::sim::{PerturbationAxis, Simulation};

const HISTORY: usize = 4000;
const LOG_LINES: usize = 2000;

fn main() -> eframe::Result {
    env_logger::init();
    let sim = match Simulation::new(SailConfig::default()) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("invalid default configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app = SailViz::new(sim);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };
    eframe::run_native("Light-Sail Dynamics", options, Box::new(|_| Ok(Box::new(app))))
}

/// Slider values in UI units (grams, GW).
struct Controls {
    solid_angle_fraction: f64,
    mass_grams: f64,
    center_of_mass_offset: f64,
    spin_rate: f64,
    timestep: f64,
    laser_gw: f64,
    delta_pos: f64,
    delta_angle: f64,
}

impl Controls {
    fn from_config(c: &SailConfig) -> Self {
        Self {
            solid_angle_fraction: c.solid_angle_fraction,
            mass_grams: c.total_mass * 1e3,
            center_of_mass_offset: c.center_of_mass_offset,
            spin_rate: c.spin_rate,
            timestep: c.timestep,
            laser_gw: c.laser_power / 1e9,
            delta_pos: 0.01,
            delta_angle: 0.001,
        }
    }
}

struct SailViz {
    sim: Simulation,
    controls: Controls,
    history: VecDeque<State>,
    log: VecDeque<String>,
    paused: bool,
    error: Option<String>,
}

impl SailViz {
    fn new(sim: Simulation) -> Self {
        let controls = Controls::from_config(sim.config());
        Self {
            sim,
            controls,
            history: VecDeque::with_capacity(HISTORY),
            log: VecDeque::with_capacity(LOG_LINES),
            paused: false,
            error: None,
        }
    }

    /// Push a slider value into the simulation; rejected values snap back.
    fn apply(&mut self, name: ParamName, value: f64) {
        if let Err(e) = self.sim.set(name, value) {
            warn!("{}", e);
            self.error = Some(e.to_string());
            self.controls = Controls {
                delta_pos: self.controls.delta_pos,
                delta_angle: self.controls.delta_angle,
                ..Controls::from_config(self.sim.config())
            };
        }
    }

    fn perturb(&mut self, axis: PerturbationAxis, delta: f64) {
        if let Err(e) = self.sim.apply_perturbation(axis, delta) {
            self.error = Some(e.to_string());
        }
    }

    /// One physics step per frame, then collect trace output.
    fn tick(&mut self) {
        if self.paused {
            return;
        }
        match self.sim.step() {
            Ok(state) => {
                if self.history.len() == HISTORY {
                    self.history.pop_front();
                }
                self.history.push_back(*state);
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.paused = true;
            }
        }
        for event in self.sim.drain_trace() {
            for line in trace::format_event(&event).lines() {
                if self.log.len() == LOG_LINES {
                    self.log.pop_front();
                }
                self.log.push_back(line.to_string());
            }
        }
    }

    fn controls_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Sail");
        let c = &mut self.controls;
        let mut changed = Vec::new();
        if ui.add(egui::Slider::new(&mut c.solid_angle_fraction, 0.05..=1.0).text("solid angle (x pi)")).changed() {
            changed.push((ParamName::SolidAngleFraction, c.solid_angle_fraction));
        }
        if ui.add(egui::Slider::new(&mut c.mass_grams, 0.1..=10.0).text("mass (g)")).changed() {
            changed.push((ParamName::TotalMass, c.mass_grams * 1e-3));
        }
        if ui.add(egui::Slider::new(&mut c.center_of_mass_offset, 0.0..=5.0).text("CoM offset (m)")).changed() {
            changed.push((ParamName::CenterOfMassOffset, c.center_of_mass_offset));
        }
        if ui.add(egui::Slider::new(&mut c.spin_rate, -50.0..=50.0).text("spin (rad/s)")).changed() {
            changed.push((ParamName::SpinRate, c.spin_rate));
        }
        if ui.add(egui::Slider::new(&mut c.timestep, 1e-5..=5e-3).logarithmic(true).text("timestep (s)")).changed() {
            changed.push((ParamName::Timestep, c.timestep));
        }
        if ui.add(egui::Slider::new(&mut c.laser_gw, 0.0..=100.0).text("laser (GW)")).changed() {
            changed.push((ParamName::LaserPower, c.laser_gw * 1e9));
        }
        for (name, value) in changed {
            self.apply(name, value);
        }

        ui.separator();
        ui.heading("Perturb");
        ui.add(egui::Slider::new(&mut self.controls.delta_pos, -0.1..=0.1).text("position (m)"));
        ui.add(egui::Slider::new(&mut self.controls.delta_angle, -0.01..=0.01).text("angle (rad)"));
        let (dp, da) = (self.controls.delta_pos, self.controls.delta_angle);
        ui.horizontal(|ui| {
            if ui.button("axial").clicked() {
                self.perturb(PerturbationAxis::AxialPos, dp);
            }
            if ui.button("lateral").clicked() {
                self.perturb(PerturbationAxis::LateralPos, dp);
            }
            if ui.button("yaw").clicked() {
                self.perturb(PerturbationAxis::Yaw, da);
            }
            if ui.button("pitch").clicked() {
                self.perturb(PerturbationAxis::Pitch, da);
            }
        });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button(if self.paused { "Resume" } else { "Pause" }).clicked() {
                self.paused = !self.paused;
            }
            if ui.button("Reset").clicked() {
                self.sim.reset();
                self.history.clear();
                self.error = None;
                self.paused = false;
            }
            if ui.button("Clear log").clicked() {
                self.log.clear();
            }
        });

        ui.separator();
        let d = self.sim.derived();
        ui.label(format!("scale factor  {:.4}", d.radius_scale_factor));
        ui.label(format!("cutoff        {:.4} m", d.cutoff_distance));
        ui.label(format!("eff. radius   {:.4} m", d.effective_radius));
        ui.label(format!("F_rad         {:.2} N", d.radiation_force));
        ui.label(format!("I / I3        {:.2e} / {:.2e}", d.inertia_transverse, d.inertia_axial));
        let (n, k) = self.sim.state().cutoff_plane();
        ui.label(format!("cutoff plane  n=({:.3}, {:.3}, {:.3}) d={:.4}", n.x, n.y, n.z, k));

        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::LIGHT_RED, err);
        }
    }
}

impl eframe::App for SailViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let s = self.sim.state();
            ui.label(format!(
                "t = {:.3} s  |  axial {:+.5} m  |  lateral {:+.5} m  |  yaw {:+.4} rad  |  pitch {:+.4} rad  |  steps {}",
                s.time,
                s.axial(),
                s.lateral(),
                s.yaw(),
                s.pitch(),
                self.sim.steps_taken(),
            ));
        });

        egui::SidePanel::left("controls").min_width(320.0).show(ctx, |ui| {
            self.controls_panel(ui);
        });

        egui::TopBottomPanel::bottom("trace").resizable(true).show(ctx, |ui| {
            ui.label("Post-perturbation trace");
            egui::ScrollArea::vertical().stick_to_bottom(true).max_height(180.0).show(ui, |ui| {
                for line in &self.log {
                    ui.monospace(line);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_h = available.y / 2.0 - 8.0;

            ui.label("Position (m)");
            let axial: PlotPoints = self.history.iter().map(|s| [s.time, s.axial()]).collect();
            let lateral: PlotPoints = self.history.iter().map(|s| [s.time, s.lateral()]).collect();
            Plot::new("position")
                .height(half_h)
                .x_axis_label("Time (s)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("axial", axial));
                    plot_ui.line(Line::new("lateral", lateral));
                });

            ui.label("Tilt (rad)");
            let yaw: PlotPoints = self.history.iter().map(|s| [s.time, s.yaw()]).collect();
            let pitch: PlotPoints = self.history.iter().map(|s| [s.time, s.pitch()]).collect();
            Plot::new("tilt")
                .height(half_h)
                .x_axis_label("Time (s)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("yaw", yaw));
                    plot_ui.line(Line::new("pitch", pitch));
                });
        });

        ctx.request_repaint();
    }
}
