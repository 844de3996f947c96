//! Simulation record built from configuration
//!
//! A `Scenario` bundles parameters, the current bodies and the number of
//! ticks executed so far. It is the unit a hosting service would store per
//! simulation id; concurrent access to one scenario is the host's concern

use log::info;

use crate::configuration::config::{BodyConfig, EngineConfig, ScenarioConfig};
use crate::error::Result;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: Parameters,
    pub bodies: Vec<Body>,
    pub step: u64,
}

impl Scenario {
    pub fn new(parameters: Parameters, bodies: Vec<Body>) -> Self {
        Self {
            parameters,
            bodies,
            step: 0,
        }
    }

    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies = cfg
            .bodies
            .into_iter()
            .map(|bc| Body::new(bc.name, NVec3::new(bc.x, bc.y, bc.z), bc.radius, bc.density))
            .collect();

        let parameters = Parameters {
            grav: cfg.grav,
            theta: cfg.theta,
            max_depth: cfg.engine.max_depth,
            min_distance: cfg.engine.min_distance,
            parallel: cfg.engine.parallel,
        };

        Self {
            parameters,
            bodies,
            step: cfg.step,
        }
    }

    pub fn to_config(&self) -> ScenarioConfig {
        let bodies = self
            .bodies
            .iter()
            .map(|b| BodyConfig {
                name: b.name.clone(),
                x: b.x.x,
                y: b.x.y,
                z: b.x.z,
                radius: b.radius,
                density: b.density,
            })
            .collect();

        ScenarioConfig {
            grav: self.parameters.grav,
            theta: self.parameters.theta,
            bodies,
            step: self.step,
            engine: EngineConfig {
                max_depth: self.parameters.max_depth,
                min_distance: self.parameters.min_distance,
                parallel: self.parameters.parallel,
            },
        }
    }

    /// Run `n` ticks, bumping `step` after each successful one.
    ///
    /// Stops at the first failing tick; the scenario then holds the state
    /// and step count of the last tick that succeeded.
    pub fn steps(&mut self, n: usize) -> Result<&[Body]> {
        let engine = Engine::new(self.parameters.clone());
        for _ in 0..n {
            let next = engine.one_step(&self.bodies)?;
            self.bodies = next;
            self.step += 1;
            info!("step {} ({} bodies)", self.step, self.bodies.len());
        }
        Ok(&self.bodies)
    }
}
