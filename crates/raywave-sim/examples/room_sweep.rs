//! Sweep received power across a small room
//!
//! Run with: cargo run -p raywave-sim --example room_sweep [scene.json]
//!
//! Without an argument a built-in two-wall room is used. Set `RUST_LOG` to
//! override the log level.

use raywave_core::geometry::{Point, Vector};
use raywave_core::observe::{init_logging, LogConfig};
use raywave_sim::{SceneDescription, SimResult, SimulationConfig, Simulator};

const ROOM: &str = r#"{
    "scale": 1.0,
    "materials": [
        { "name": "concrete", "reflection": { "model": "fresnel", "eta": 5.3 } },
        { "name": "metal", "reflection": { "model": "fixed", "alpha": 0.95 } }
    ],
    "walls": [
        { "start": {"x": 20.0, "y": 40.0}, "end": {"x": 480.0, "y": 40.0}, "material": "concrete" },
        { "start": {"x": 20.0, "y": 260.0}, "end": {"x": 480.0, "y": 260.0}, "material": "metal" },
        { "start": {"x": 250.0, "y": 40.0}, "end": {"x": 250.0, "y": 170.0}, "width": 3.0, "material": "concrete" }
    ],
    "transmitters": [{ "position": {"x": 60.0, "y": 150.0}, "power": 0.1, "freq": 2.4e9 }],
    "receivers": [{ "position": {"x": 420.0, "y": 200.0} }]
}"#;

fn main() -> SimResult<()> {
    init_logging(&LogConfig::development());

    let description = match std::env::args().nth(1) {
        Some(path) => SceneDescription::load(path)?,
        None => SceneDescription::from_json(ROOM)?,
    };
    let config = SimulationConfig::default().with_sweep_steps(20);
    let sim = Simulator::from_description(&description, config)?;

    let ray = sim.trace(0, Vector::new(1.0, 0.6))?;
    println!("Single ray, {} bounces:", ray.bounces().len());
    for point in ray.path_points() {
        println!("  ({:7.2}, {:7.2})", point.x, point.y);
    }

    let orderings = vec![vec![0], vec![1], vec![0, 1], vec![1, 0]];
    if !sim.scene().receivers.is_empty() {
        let watts = sim.receiver_power(0, 0, &orderings)?;
        println!("\nReceiver 0: {:.2} dBm", raywave_core::physics::watts_to_dbm(watts));
    }

    let from = Point::new(100.0, 220.0);
    let to = Point::new(460.0, 220.0);
    let sweep = sim.multi_ray_sweep(0, from, to, &orderings)?;
    println!("\nMulti-ray sweep:");
    println!("{:>8} {:>8} {:>10} {:>10}", "x", "y", "dBm", "loss dB");
    for i in 0..sweep.len() {
        println!(
            "{:8.1} {:8.1} {:10.2} {:10.2}",
            sweep.xs[i], sweep.ys[i], sweep.power_dbm[i], sweep.loss_db[i]
        );
    }

    if sim.scene().walls.len() > 2 {
        let edge = sim.scene().walls[2].end();
        let shadow = sim.diffraction_sweep(0, edge, Point::new(400.0, 50.0), Point::new(400.0, 250.0))?;
        println!("\nKnife-edge sweep over ({:.0}, {:.0}):", edge.x, edge.y);
        for i in 0..shadow.sweep.len() {
            println!(
                "  y = {:6.1}  {:8.2} dBm  edge loss {:6.2} dB{}",
                shadow.sweep.ys[i],
                shadow.sweep.power_dbm[i],
                shadow.attenuation_db[i],
                if shadow.line_of_sight[i] { "  (LOS)" } else { "" }
            );
        }
    }

    Ok(())
}
