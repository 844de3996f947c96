pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod scenario;
pub mod barnes_hut;
