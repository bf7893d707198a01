//! Schedulable units: update actions and method bindings.
//!
//! A unit's read and write sets are declared explicitly at registration;
//! the core never inspects a body's source. The sets are kept sorted and
//! deduplicated so constraint derivation is deterministic.

use crate::ids::{ComponentId, SignalId, UnitId};
use kairos_common::Ident;
use serde::{Deserialize, Serialize};

/// How a unit's writes take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Computes outputs from current inputs; writes are immediate (blocking)
    /// and visible to every later unit in the same pass.
    Combinational,
    /// Computes next-cycle state; writes are pending (non-blocking) and
    /// become visible only at the commit phase.
    Sequential,
    /// The schedulable form of a method binding; writes are immediate, like
    /// a combinational unit, but the runtime body is a guard/call pair.
    MethodCall,
}

impl UnitKind {
    /// Returns `true` when writes land in the net's current value right away.
    pub fn writes_immediately(self) -> bool {
        !matches!(self, UnitKind::Sequential)
    }
}

/// One unit of update behavior participating in scheduling and execution.
///
/// The executable body is supplied separately to the simulation engine; the
/// IR carries only the declarative contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedUnit {
    /// The unit's id.
    pub id: UnitId,
    /// The registered name.
    pub name: Ident,
    /// The owning component.
    pub owner: ComponentId,
    /// The assignment discipline.
    pub kind: UnitKind,
    /// Signals this unit reads, sorted by id, deduplicated.
    pub reads: Vec<SignalId>,
    /// Signals this unit writes, sorted by id, deduplicated.
    pub writes: Vec<SignalId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_write_kinds() {
        assert!(UnitKind::Combinational.writes_immediately());
        assert!(UnitKind::MethodCall.writes_immediately());
        assert!(!UnitKind::Sequential.writes_immediately());
    }

    #[test]
    fn construction() {
        let u = SchedUnit {
            id: UnitId::from_raw(0),
            name: Ident::from_raw(1),
            owner: ComponentId::from_raw(0),
            kind: UnitKind::Sequential,
            reads: vec![SignalId::from_raw(0)],
            writes: vec![SignalId::from_raw(1)],
        };
        assert_eq!(u.kind, UnitKind::Sequential);
        assert_eq!(u.reads.len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let u = SchedUnit {
            id: UnitId::from_raw(2),
            name: Ident::from_raw(3),
            owner: ComponentId::from_raw(1),
            kind: UnitKind::MethodCall,
            reads: vec![],
            writes: vec![SignalId::from_raw(5)],
        };
        let json = serde_json::to_string(&u).unwrap();
        let back: SchedUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, UnitKind::MethodCall);
        assert_eq!(back.writes, vec![SignalId::from_raw(5)]);
    }
}
