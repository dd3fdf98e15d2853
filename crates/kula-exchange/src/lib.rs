//! Orchestration for the Kula exchange.
//!
//! - [`RunController`]: the single-flight gate around solver passes
//! - [`Exchange`]: the facade wiring pool, solver, registry and events
//!   into one submit/solve/observe surface
//!
//! Everything above this crate (the HTTP node, the SDK) is glue over
//! [`Exchange`]; everything below it is a building block.

pub mod controller;
pub mod exchange;

pub use controller::RunController;
pub use exchange::{Exchange, ExchangeConfig};
