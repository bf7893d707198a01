//! Elaboration pipeline for the Kairos cycle-based simulator.
//!
//! Elaboration runs three stages over a declarative
//! [`Circuit`](kairos_ir::Circuit):
//!
//! 1. **Connectivity resolution** ([`netlist`]) merges connected signals
//!    into nets via union-find and validates widths, directions, and
//!    required ports.
//! 2. **Constraint collection** ([`constraints`]) derives implicit
//!    writer-before-reader orderings, folds in explicit and call-edge
//!    constraints, and merges same-phase groups.
//! 3. **Scheduling** ([`schedule`]) computes the single deterministic
//!    execution order, failing on combinational loops.
//!
//! Every failure is fatal: the pipeline stops at the first error and never
//! hands an inconsistent design to the simulation engine.

#![warn(missing_docs)]

pub mod constraints;
pub mod errors;
pub mod netlist;
pub mod schedule;

use kairos_common::Interner;
use kairos_ir::Circuit;
use serde::{Deserialize, Serialize};

pub use constraints::{ConstraintSet, OrderEdge, Provenance};
pub use errors::ElabError;
pub use netlist::{CallEdge, Net, Netlist};
pub use schedule::Schedule;

/// The complete result of a successful elaboration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Elaboration {
    /// The resolved netlist.
    pub netlist: Netlist,
    /// The collected constraint relation.
    pub constraints: ConstraintSet,
    /// The deterministic execution order.
    pub schedule: Schedule,
}

/// Runs the full elaboration pipeline.
pub fn elaborate(circuit: &Circuit, interner: &Interner) -> Result<Elaboration, ElabError> {
    let netlist = netlist::resolve(circuit, interner)?;
    let constraints = constraints::collect(circuit, &netlist, interner)?;
    let schedule = schedule::schedule(circuit, &constraints, interner)?;
    Ok(Elaboration {
        netlist,
        constraints,
        schedule,
    })
}
