//! Signal declarations: ports and internal wires.

use crate::ids::{ComponentId, SignalId};
use kairos_common::Ident;
use serde::{Deserialize, Serialize};

/// The role of a signal within its owning component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// A port driven from outside the component.
    Input,
    /// A port driven from inside the component.
    Output,
    /// An internal wire, invisible outside the component.
    Wire,
}

impl SignalKind {
    /// Returns `true` for `Input` and `Output`.
    ///
    /// Ports are the only signals visible outside their owning component,
    /// and the only signals an interface binding or a parent connection may
    /// touch.
    pub fn is_port(self) -> bool {
        matches!(self, SignalKind::Input | SignalKind::Output)
    }
}

/// A named bit-vector slot owned by exactly one component.
///
/// The value itself lives in the simulation engine's per-net state; the
/// declaration only carries the width and connection contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The signal's id.
    pub id: SignalId,
    /// The declared name.
    pub name: Ident,
    /// The owning component.
    pub owner: ComponentId,
    /// Bit width, `1..=1023`.
    pub width: u32,
    /// Port direction or internal wire.
    pub kind: SignalKind,
    /// Whether leaving this signal unconnected is an elaboration error.
    /// Defaults to `false`: ports may be deliberately left floating.
    pub required: bool,
}
