//! Elaboration error types.
//!
//! All elaboration errors are fatal: the pipeline stops at the first failure
//! and never proceeds to scheduling or simulation. Each variant carries the
//! hierarchical paths of every implicated entity, resolved at construction
//! time so the error is self-describing.

use kairos_ir::UnitId;

/// Errors detected during connectivity resolution, constraint collection,
/// or scheduling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElabError {
    /// Two bound interfaces do not declare complementary roles.
    #[error("interfaces {a} and {b} do not declare complementary roles")]
    RoleMismatch {
        /// Path of the first interface.
        a: String,
        /// Path of the second interface.
        b: String,
    },

    /// A wire connection joins two structurally unrelated signals.
    #[error("cannot connect {a} to {b}: signals are not structurally related")]
    IllegalConnection {
        /// Path of the first signal.
        a: String,
        /// Path of the second signal.
        b: String,
    },

    /// Two name-matched interface ports have non-complementary directions.
    #[error("interface ports {a} and {b} do not have complementary directions")]
    DirectionConflict {
        /// Path of the first port.
        a: String,
        /// Path of the second port.
        b: String,
    },

    /// A port marked required ended up in a single-member net.
    #[error("required port {port} is left unconnected")]
    Unconnected {
        /// Path of the floating port.
        port: String,
    },

    /// A method-role interface was bound without a unit attached.
    #[error("method interface {iface} has no bound unit")]
    MissingMethod {
        /// Path of the offending interface.
        iface: String,
    },

    /// Signals merged into one net disagree on bit width.
    #[error("net width mismatch: {a} is {a_width} bits but {b} is {b_width} bits")]
    WidthMismatch {
        /// Path of the first signal.
        a: String,
        /// Width of the first signal.
        a_width: u32,
        /// Path of the second signal.
        b: String,
        /// Width of the second signal.
        b_width: u32,
    },

    /// More than one unit drives the same net's value.
    #[error("net {net} has multiple drivers: {drivers}")]
    MultipleDrivers {
        /// Path of the contested net (named after its first member).
        net: String,
        /// Comma-joined paths of every driving unit.
        drivers: String,
        /// Ids of every driving unit.
        units: Vec<UnitId>,
    },

    /// Contradictory explicit ordering constraints.
    ///
    /// Distinct from [`CombinationalLoop`](ElabError::CombinationalLoop):
    /// this is an author error in the declared constraints, not an implicit
    /// dependency cycle.
    #[error("contradictory ordering constraints between {a} and {b}")]
    ConstraintConflict {
        /// Path of the first unit.
        a: String,
        /// Path of the second unit.
        b: String,
    },

    /// A dependency cycle among combinational units.
    ///
    /// Reported once, at elaboration; carries every unit on the cycle.
    #[error("combinational loop: {cycle}")]
    CombinationalLoop {
        /// Human-readable cycle listing (joined unit paths).
        cycle: String,
        /// Ids of every unit on the cycle, in id order.
        units: Vec<UnitId>,
    },
}
