//! Declared connections and explicit ordering constraints.

use crate::ids::{IfaceId, SignalId, UnitId};
use serde::{Deserialize, Serialize};

/// A declared connection, processed during connectivity resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connection {
    /// A pairwise signal binding; merges the two signals' nets.
    Wire {
        /// One endpoint.
        a: SignalId,
        /// The other endpoint.
        b: SignalId,
    },
    /// An interface-level binding; expands into pairwise port bindings (and,
    /// for method roles, a call edge) during resolution.
    Interface {
        /// One interface.
        a: IfaceId,
        /// The other interface.
        b: IfaceId,
    },
}

/// The flavor of an author-declared ordering constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// `first` must execute before `second` every cycle.
    Before,
    /// The two units are inseparable: they schedule as one phase group,
    /// expanded in declaration order.
    SamePhase,
}

/// An author-declared ordering relation between two schedulable units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConstraint {
    /// The constraint flavor.
    pub kind: ConstraintKind,
    /// The first unit (`before` side for [`ConstraintKind::Before`]).
    pub first: UnitId,
    /// The second unit.
    pub second: UnitId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_connection() {
        let c = Connection::Wire {
            a: SignalId::from_raw(0),
            b: SignalId::from_raw(1),
        };
        assert!(matches!(c, Connection::Wire { .. }));
    }

    #[test]
    fn constraint_construction() {
        let c = OrderConstraint {
            kind: ConstraintKind::Before,
            first: UnitId::from_raw(0),
            second: UnitId::from_raw(1),
        };
        assert_eq!(c.kind, ConstraintKind::Before);
    }

    #[test]
    fn serde_roundtrip() {
        let c = Connection::Interface {
            a: IfaceId::from_raw(0),
            b: IfaceId::from_raw(1),
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: Connection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
