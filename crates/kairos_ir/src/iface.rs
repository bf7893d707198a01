//! Interface bundles: named groups of ports bound as one unit.
//!
//! Binding two interfaces expands into pairwise port connections after role
//! validation. `Send`/`Recv` pairs model streaming data (e.g. ready/valid);
//! `Caller`/`Callee` pairs additionally record a directed call edge between
//! the two sides' schedulable units.

use crate::ids::{ComponentId, IfaceId, SignalId, UnitId};
use kairos_common::Ident;
use serde::{Deserialize, Serialize};

/// The role an interface plays in a binding.
///
/// A binding is legal only between complementary roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IfaceRole {
    /// Data source of a streaming pair.
    Send,
    /// Data sink of a streaming pair.
    Recv,
    /// Initiating side of a method binding.
    Caller,
    /// Providing side of a method binding.
    Callee,
}

impl IfaceRole {
    /// Returns the role this one may bind to.
    pub fn complement(self) -> IfaceRole {
        match self {
            IfaceRole::Send => IfaceRole::Recv,
            IfaceRole::Recv => IfaceRole::Send,
            IfaceRole::Caller => IfaceRole::Callee,
            IfaceRole::Callee => IfaceRole::Caller,
        }
    }

    /// Returns `true` for the method-binding roles.
    pub fn is_method(self) -> bool {
        matches!(self, IfaceRole::Caller | IfaceRole::Callee)
    }
}

/// A named bundle of ports on one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    /// The interface's id.
    pub id: IfaceId,
    /// The registered name.
    pub name: Ident,
    /// The owning component.
    pub owner: ComponentId,
    /// The binding role.
    pub role: IfaceRole,
    /// Member ports, matched by signal name during binding expansion.
    pub ports: Vec<SignalId>,
    /// For `Caller`: the unit that performs the call. For `Callee`: the
    /// method-call unit providing the call and guard bodies. Unused for
    /// streaming roles.
    pub method: Option<UnitId>,
}
