//! Cycle discovery for the Kula exchange.
//!
//! This crate turns a snapshot of open intents into settleable matches:
//!
//! - [`CompatGraph`]: the directed compatibility graph over a snapshot
//! - [`Solver`]: the trait a cycle-discovery strategy implements
//! - [`GreedySolver`]: the deterministic first-found greedy strategy
//!
//! Solvers are pure with respect to the exchange: they read a snapshot and
//! produce matches, and never touch the live pool.

pub mod graph;
pub mod greedy;
pub mod solver;

pub use graph::CompatGraph;
pub use greedy::GreedySolver;
pub use solver::{Solver, SolverConfig};
