use std::time::Instant;

use crate::simulation::engine::Engine;
use crate::simulation::forces::{BarnesHutGravity, DirectGravity, ForceModel};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

/// Helper to build a deterministic body set of size `n`
pub fn make_bodies(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec3::new(
                (i_f * 0.37).sin() * 50.0,
                (i_f * 0.13).cos() * 50.0,
                (i_f * 0.07).sin() * 50.0 + i_f * 1e-3,
            );
            Body::new(format!("b{i}"), x, 0.1, 1.0)
        })
        .collect()
}

fn make_params() -> Parameters {
    Parameters::new(1e-3, 0.5)
}

/// Time direct vs tree force evaluation and a full engine tick for growing N
pub fn bench_step() {
    let ns = [200, 400, 800, 1600, 3200, 6400];

    for n in ns {
        let bodies = make_bodies(n);
        let params = make_params();
        let mut out = vec![NVec3::zeros(); n];

        let direct = DirectGravity {
            grav: params.grav,
            min_distance: params.min_distance,
        };
        let bh = BarnesHutGravity::new(params.clone());
        let engine = Engine::new(params);

        let t0 = Instant::now();
        let direct_ok = direct.forces(&bodies, &mut out).is_ok();
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        let bh_ok = bh.forces(&bodies, &mut out).is_ok();
        let dt_bh = t1.elapsed().as_secs_f64();

        let t2 = Instant::now();
        let step_ok = engine.one_step(&bodies).is_ok();
        let dt_step = t2.elapsed().as_secs_f64();

        if !(direct_ok && bh_ok && step_ok) {
            println!("N = {n:5}, failed (direct ok: {direct_ok}, BH ok: {bh_ok}, step ok: {step_ok})");
            continue;
        }
        println!("N = {n:5}, direct = {:8.6} s, BH = {:8.6} s, tick = {:8.6} s", dt_direct, dt_bh, dt_step);
    }
}

/// Tick time against theta for a fixed N
/// Paste output directly into a spreadsheet to graph
pub fn bench_theta_curve() {
    let n = 3200;
    let bodies = make_bodies(n);

    println!("theta,tick_ms");

    for k in 0..=20 {
        let mut params = make_params();
        params.theta = k as f64 * 0.25;
        let engine = Engine::new(params);

        let t0 = Instant::now();
        match engine.one_step(&bodies) {
            Ok(_) => println!("{:.2},{:.6}", k as f64 * 0.25, t0.elapsed().as_secs_f64() * 1000.0),
            Err(e) => println!("{:.2},failed: {e}", k as f64 * 0.25),
        }
    }
}
