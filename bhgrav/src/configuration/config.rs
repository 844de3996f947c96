//! Serde records for loading and saving simulations.
//!
//! These mirror the wire shape used by services that host simulations:
//!
//! - [`BodyConfig`]     – `{name, x, y, z, radius, density}`
//! - [`EngineConfig`]   – optional engine limits (depth, distance, parallelism)
//! - [`ScenarioConfig`] – `{grav, theta, bodies, step}` plus `engine`
//!
//! # YAML format
//!
//! ```yaml
//! grav: 1.0
//! theta: 0.5
//! step: 0               # optional, ticks already executed
//!
//! engine:               # optional block
//!   max_depth: 48
//!   min_distance: 0.0
//!   parallel: false
//!
//! bodies:
//!   - name: "a"
//!     x: 0.0
//!     y: 0.0
//!     z: 0.0
//!     radius: 1.0
//!     density: 1.0
//! ```
//!
//! JSON files use the same field names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::simulation::params::DEFAULT_MAX_DEPTH;

/// A single body as it appears on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
    pub density: f64,
}

/// Engine limits. Every field falls back to its default when omitted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub max_depth: usize, // halvings allowed below the root
    pub min_distance: f64, // r <= this fails the tick
    pub parallel: bool, // rayon over bodies during force evaluation
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_distance: 0.0,
            parallel: false,
        }
    }
}

/// Top-level simulation record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub grav: f64, // gravitational constant
    pub theta: f64, // opening-angle threshold
    pub bodies: Vec<BodyConfig>,
    #[serde(default)]
    pub step: u64, // ticks executed so far
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a scenario file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_without_optional_blocks_uses_defaults() {
        let cfg = ScenarioConfig::from_yaml_str(
            "grav: 9.81\ntheta: 0.5\nbodies:\n  - {name: hi, x: 10, y: 10, z: 10, radius: 1, density: 1}\n",
        )
        .unwrap();

        assert_eq!(cfg.step, 0);
        assert_eq!(cfg.engine, EngineConfig::default());
        assert_eq!(cfg.bodies.len(), 1);
        assert_eq!(cfg.bodies[0].name, "hi");
    }

    #[test]
    fn json_uses_wire_field_names() {
        let cfg = ScenarioConfig {
            grav: 1.0,
            theta: 0.5,
            bodies: vec![BodyConfig {
                name: "a".into(),
                x: 1.0,
                y: 2.0,
                z: 3.0,
                radius: 1.0,
                density: 2.0,
            }],
            step: 4,
            engine: EngineConfig::default(),
        };

        let json = cfg.to_json_pretty().unwrap();
        for field in ["\"grav\"", "\"theta\"", "\"bodies\"", "\"step\"", "\"radius\"", "\"density\""] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
        assert_eq!(ScenarioConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = ScenarioConfig::from_yaml_str("grav: [oops").unwrap_err();
        assert!(matches!(err, crate::error::SimError::Config(_)));
    }
}
