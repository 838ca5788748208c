//! OlapSchema engine
//!
//! Checks that run over whole schemas:
//! - Schema evolution (backward compatibility with a prior version)
//! - Report generation with configured severities

pub mod check;
pub mod evolution;

pub use check::SchemaCheck;
pub use evolution::{EvolutionError, SchemaEvolution};
