//! Force models for the stepping engine
//!
//! Both models return one force vector per body, in input order, with the
//! same pairwise law `grav * m_i * m_j * (x_j - x_i) / r^3` and no softening

use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::simulation::barnes_hut::{Cuboid, ForceQuery, Octree};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

/// Anything that can produce the net force on every body of a slice
pub trait ForceModel {
    fn forces(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()>;
}

/// Direct pairwise gravity (exact n^2 sum)
pub struct DirectGravity {
    pub grav: f64,
    pub min_distance: f64,
}

impl ForceModel for DirectGravity {
    fn forces(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()> {
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }

        let n = bodies.len();
        let masses: Vec<f64> = bodies.iter().map(Body::mass).collect();

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let bi = &bodies[i];
            for j in (i + 1)..n {
                let bj = &bodies[j];

                // r points from i to j: i is pulled along +r, j along -r
                let r = bj.x - bi.x;
                let dist = r.norm();
                if dist <= self.min_distance {
                    return Err(SimError::DegenerateDistance {
                        body: bi.name.clone(),
                        other: bj.name.clone(),
                        distance: dist,
                    });
                }

                let f = r * (self.grav * masses[i] * masses[j] / (dist * dist * dist));
                out[i] += f;
                out[j] -= f;
            }
        }
        Ok(())
    }
}

/// Gravity evaluated through a freshly built Barnes–Hut octree
pub struct BarnesHutGravity {
    pub params: Parameters,
}

impl BarnesHutGravity {
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }
}

impl ForceModel for BarnesHutGravity {
    fn forces(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()> {
        let Some(bounds) = Cuboid::enclosing(bodies) else {
            return Ok(());
        };

        let mut tree = Octree::build(bodies, bounds, self.params.max_depth)?;
        tree.prune();
        tree.aggregate_mass(bodies);

        let order: Vec<usize> = (0..bodies.len()).collect();
        let forces = tree_forces(&tree, bodies, &order, &self.params)?;
        out.copy_from_slice(&forces);
        Ok(())
    }
}

impl From<&Parameters> for ForceQuery {
    fn from(p: &Parameters) -> Self {
        ForceQuery {
            grav: p.grav,
            theta: p.theta,
            min_distance: p.min_distance,
        }
    }
}

/// Force on each body in `order` against an aggregated tree.
///
/// Evaluations are independent once aggregation is done, so with
/// `params.parallel` they are spread over the rayon pool.
pub fn tree_forces(tree: &Octree, bodies: &[Body], order: &[usize], params: &Parameters) -> Result<Vec<NVec3>> {
    let q = ForceQuery::from(params);
    if params.parallel {
        order
            .par_iter()
            .map(|&i| tree.force_on_body(i, bodies, &q))
            .collect()
    } else {
        order
            .iter()
            .map(|&i| tree.force_on_body(i, bodies, &q))
            .collect()
    }
}
