//! Step engine
//!
//! One tick: bound the bodies, build and prune a fresh octree, aggregate
//! mass, compute every body's force against the root, then apply all forces
//! as positional displacements. The tree is dropped at the end of the tick.

use log::debug;

use crate::error::Result;
use crate::simulation::barnes_hut::{Cuboid, Octree};
use crate::simulation::forces::tree_forces;
use crate::simulation::params::Parameters;
use crate::simulation::states::Body;

#[derive(Debug, Clone)]
pub struct Engine {
    pub params: Parameters,
}

impl Engine {
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }

    /// Build, prune and aggregate the tree for the current positions.
    ///
    /// Returns `None` when there are no bodies.
    pub fn build_tree(&self, bodies: &[Body]) -> Result<Option<Octree>> {
        self.params.validate()?;
        for b in bodies {
            b.validate()?;
        }

        let Some(bounds) = Cuboid::enclosing(bodies) else {
            return Ok(None);
        };

        let mut tree = Octree::build(bodies, bounds, self.params.max_depth)?;
        tree.prune();
        let (mass, _) = tree.aggregate_mass(bodies);

        debug!(
            "tree over {} bodies: {} nodes, root origin {:?} extent {:?}, mass {}",
            bodies.len(),
            tree.reachable().len(),
            bounds.origin.as_slice(),
            bounds.extent.as_slice(),
            mass
        );
        Ok(Some(tree))
    }

    /// Advance `bodies` by a single tick.
    ///
    /// The result is in leaf traversal order, which need not match the input
    /// order; key by `Body::name` when identity matters. On error `bodies` is
    /// untouched and no partial update is returned.
    pub fn one_step(&self, bodies: &[Body]) -> Result<Vec<Body>> {
        let Some(tree) = self.build_tree(bodies)? else {
            return Ok(Vec::new());
        };

        let order = tree.leaf_indices();
        // Every force is computed against the unmoved positions first
        let forces = tree_forces(&tree, bodies, &order, &self.params)?;

        let next = order
            .iter()
            .zip(forces)
            .map(|(&i, f)| {
                let mut b = bodies[i].clone();
                b.apply_displacement(f);
                b
            })
            .collect();
        Ok(next)
    }

    /// Apply [`Engine::one_step`] `n` times, feeding each output back in.
    ///
    /// Only the final state is returned. `n == 0` returns the input as is.
    pub fn steps(&self, n: usize, bodies: Vec<Body>) -> Result<Vec<Body>> {
        let mut current = bodies;
        for tick in 0..n {
            current = self.one_step(&current)?;
            debug!("tick {}/{} done", tick + 1, n);
        }
        Ok(current)
    }
}

/// Free-function form of [`Engine::steps`] for callers that keep the
/// parameters themselves.
pub fn steps(n: usize, bodies: Vec<Body>, grav: f64, theta: f64) -> Result<Vec<Body>> {
    Engine::new(Parameters::new(grav, theta)).steps(n, bodies)
}
