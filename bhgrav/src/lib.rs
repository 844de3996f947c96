pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::{Result, SimError};

pub use simulation::states::{Body, NVec3};
pub use simulation::params::Parameters;
pub use simulation::barnes_hut::{Cuboid, ForceQuery, OctNode, Octree, Traversal};
pub use simulation::forces::{BarnesHutGravity, DirectGravity, ForceModel};
pub use simulation::engine::{steps, Engine};
pub use simulation::scenario::Scenario;

pub use configuration::config::{BodyConfig, EngineConfig, ScenarioConfig};

pub use visualization::tree_dump::TreeDump;

pub use benchmark::benchmark::{bench_step, bench_theta_curve};
