//! Particle swarm optimizers

pub mod spso;

pub use spso::{Spso, SpsoConfig, Topology};
