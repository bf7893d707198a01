//! Cycle-based execution engine for the Kairos simulator.
//!
//! The engine consumes an elaborated circuit (from `kairos_elaborate`) plus
//! a table of opaque unit bodies, and replays the statically computed
//! schedule one [`tick`](SimEngine::tick) at a time: evaluate every unit in
//! order, then commit all pending register writes. `peek` and `poke` form
//! the testbench driving contract.

#![warn(missing_docs)]

pub mod body;
pub mod engine;
pub mod error;
pub mod scope;
pub mod state;

pub use body::{BodyShape, UnitBodies, UnitBody};
pub use engine::SimEngine;
pub use error::SimError;
pub use scope::EvalScope;
pub use state::{NetState, UnitAccess};
