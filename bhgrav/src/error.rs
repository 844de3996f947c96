//! Error types for the stepping engine.
//!
//! Every failure aborts the current tick. Callers get their input back
//! untouched and decide whether to retry, skip or abort the run.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Two bodies (or a body and a cluster's centre of mass) are too close
    /// to evaluate an inverse-square force.
    #[error("degenerate distance {distance} between body `{body}` and `{other}`")]
    DegenerateDistance {
        body: String,
        other: String,
        distance: f64,
    },

    /// Separating two bodies would need more halvings than `max_depth`.
    #[error("subdivision exceeded max depth {depth} while inserting body `{body}`")]
    UnboundedSubdivision { depth: usize, body: String },

    /// No child cuboid contains the body.
    #[error("body `{body}` lies outside the tree bounds")]
    OutOfBounds { body: String },

    #[error("invalid body `{name}`: {reason}")]
    InvalidBody { name: String, reason: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for SimError {
    fn from(e: serde_yaml::Error) -> Self {
        SimError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Config(e.to_string())
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
