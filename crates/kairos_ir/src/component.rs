//! Components: named nodes of the design hierarchy.
//!
//! Components are stored in a flat arena and reference their parent and
//! children by id, never by owning reference. Children are kept in
//! registration order, so iteration order is deterministic.

use crate::ids::{ComponentId, IfaceId, SignalId, UnitId};
use kairos_common::Ident;
use serde::{Deserialize, Serialize};

/// A node in the component hierarchy.
///
/// Owns (by id) its child components, signals, interfaces, and schedulable
/// units. Every component has exactly one parent except the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// The component's id.
    pub id: ComponentId,
    /// The registered name.
    pub name: Ident,
    /// Array index when the component was registered as a child-array entry;
    /// rendered as `name[index]` in hierarchical paths.
    pub index: Option<u32>,
    /// The parent component, `None` only for the root.
    pub parent: Option<ComponentId>,
    /// Child components in registration order.
    pub children: Vec<ComponentId>,
    /// Signals declared on this component, in registration order.
    pub signals: Vec<SignalId>,
    /// Interface bundles declared on this component.
    pub ifaces: Vec<IfaceId>,
    /// Schedulable units declared on this component.
    pub units: Vec<UnitId>,
}

impl Component {
    /// Creates an empty component record.
    pub fn new(id: ComponentId, name: Ident, parent: Option<ComponentId>) -> Self {
        Self {
            id,
            name,
            index: None,
            parent,
            children: Vec::new(),
            signals: Vec::new(),
            ifaces: Vec::new(),
            units: Vec::new(),
        }
    }
}
