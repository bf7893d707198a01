//! Flat runtime state: per-net values and per-unit access records.

use kairos_common::Bits;
use kairos_ir::{NetId, UnitId, UnitKind};

/// Runtime state of one net.
///
/// The `current` value is what every read observes. A non-blocking write
/// lands in `pending` and becomes current only at the commit phase, the
/// single place register state ever changes.
#[derive(Debug, Clone)]
pub struct NetState {
    /// Hierarchical name (the net's first member signal), for diagnostics.
    pub name: String,
    /// The net's bit width.
    pub width: u32,
    /// The committed / blocking-visible value.
    pub current: Bits,
    /// The pending non-blocking value, if one was written this cycle.
    pub pending: Option<Bits>,
    /// Whether a testbench may `poke` this net directly.
    pub pokeable: bool,
}

impl NetState {
    /// Creates a net state initialized to all zeros.
    pub fn new(name: String, width: u32, pokeable: bool) -> Self {
        Self {
            name,
            width,
            current: Bits::new(width),
            pending: None,
            pokeable,
        }
    }
}

/// Pre-resolved access contract of one schedulable unit.
///
/// Read/write sets are projected onto net ids at engine construction so the
/// per-access checks during evaluation are simple membership tests on small
/// sorted vectors.
#[derive(Debug, Clone)]
pub struct UnitAccess {
    /// The unit's id.
    pub id: UnitId,
    /// Hierarchical path, for diagnostics.
    pub name: String,
    /// The assignment discipline.
    pub kind: UnitKind,
    /// Nets this unit may read, sorted.
    pub reads: Vec<NetId>,
    /// Nets this unit may write, sorted.
    pub writes: Vec<NetId>,
}
