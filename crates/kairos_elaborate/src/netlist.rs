//! Connectivity resolution: merging connected signals into nets.
//!
//! Every declared connection merges two union-find classes; interface
//! bindings expand into pairwise port bindings first. After all connections
//! are processed the classes become [`Net`]s, each validated for uniform bit
//! width. Method-role bindings additionally yield directed [`CallEdge`]s
//! instead of (only) shared wires.

use std::collections::BTreeMap;

use kairos_common::Interner;
use kairos_ir::{
    Arena, Circuit, Connection, IfaceId, IfaceRole, NetId, SignalId, SignalKind, UnitId,
};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::errors::ElabError;

/// An electrical equivalence class of signals.
///
/// Invariant: every member has the same bit width, established during
/// resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// The net's id.
    pub id: NetId,
    /// The shared bit width.
    pub width: u32,
    /// Member signals, ordered by id.
    pub signals: Vec<SignalId>,
    /// Whether a testbench may `poke` this net directly: true exactly when
    /// the net contains a port of the root component.
    pub pokeable: bool,
}

/// A directed call edge produced by a `Caller`/`Callee` interface binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdge {
    /// The unit performing the call.
    pub caller: UnitId,
    /// The method-call unit being invoked.
    pub callee: UnitId,
}

/// The resolved netlist: nets, the signal-to-net mapping, and call edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Netlist {
    /// All nets, ordered by their smallest member signal.
    pub nets: Arena<NetId, Net>,
    /// Net of each signal, indexed by raw signal id.
    signal_net: Vec<NetId>,
    /// Call edges extracted from method bindings.
    pub call_edges: Vec<CallEdge>,
}

impl Netlist {
    /// Returns the net a signal was merged into.
    pub fn net_of(&self, sig: SignalId) -> NetId {
        self.signal_net[sig.as_raw() as usize]
    }
}

/// Resolves all declared connections of a circuit into a [`Netlist`].
pub fn resolve(circuit: &Circuit, interner: &Interner) -> Result<Netlist, ElabError> {
    let signal_count = circuit.signals.len();
    let mut uf = UnionFind::<u32>::new(signal_count);
    let mut call_edges = Vec::new();

    for conn in &circuit.connections {
        match *conn {
            Connection::Wire { a, b } => {
                check_related(circuit, interner, a, b)?;
                uf.union(a.as_raw(), b.as_raw());
            }
            Connection::Interface { a, b } => {
                expand_iface(circuit, interner, a, b, &mut uf, &mut call_edges)?;
            }
        }
    }

    // Group signals by union-find root; iterating in id order makes each
    // group's first member its smallest.
    let mut groups: BTreeMap<u32, Vec<SignalId>> = BTreeMap::new();
    for sig in circuit.signals.ids() {
        groups.entry(uf.find(sig.as_raw())).or_default().push(sig);
    }
    let mut ordered: Vec<Vec<SignalId>> = groups.into_values().collect();
    ordered.sort_by_key(|members| members[0]);

    let mut nets = Arena::new();
    let mut signal_net = vec![NetId::from_raw(0); signal_count];
    for members in ordered {
        let first = &circuit.signals[members[0]];
        let width = first.width;
        for &sig in &members[1..] {
            let s = &circuit.signals[sig];
            if s.width != width {
                return Err(ElabError::WidthMismatch {
                    a: circuit.signal_path(members[0], interner),
                    a_width: width,
                    b: circuit.signal_path(sig, interner),
                    b_width: s.width,
                });
            }
        }
        let pokeable = members
            .iter()
            .any(|&s| circuit.signals[s].owner == circuit.root && circuit.signals[s].kind.is_port());
        let id = nets.alloc_with(|id| Net {
            id,
            width,
            signals: members.clone(),
            pokeable,
        });
        for &sig in &members {
            signal_net[sig.as_raw() as usize] = id;
        }
    }

    // A required port must have ended up electrically joined to something.
    for (sig, s) in circuit.signals.iter() {
        if s.required {
            let net = &nets[signal_net[sig.as_raw() as usize]];
            if net.signals.len() < 2 {
                return Err(ElabError::Unconnected {
                    port: circuit.signal_path(sig, interner),
                });
            }
        }
    }

    Ok(Netlist {
        nets,
        signal_net,
        call_edges,
    })
}

/// Validates that two signals may be wired together: same component,
/// parent/child (the child side through a port), or sibling ports.
fn check_related(
    circuit: &Circuit,
    interner: &Interner,
    a: SignalId,
    b: SignalId,
) -> Result<(), ElabError> {
    let sa = &circuit.signals[a];
    let sb = &circuit.signals[b];
    let pa = circuit.components[sa.owner].parent;
    let pb = circuit.components[sb.owner].parent;

    let ok = if sa.owner == sb.owner {
        true
    } else if pb == Some(sa.owner) {
        sb.kind.is_port()
    } else if pa == Some(sb.owner) {
        sa.kind.is_port()
    } else if pa.is_some() && pa == pb {
        sa.kind.is_port() && sb.kind.is_port()
    } else {
        false
    };

    if ok {
        Ok(())
    } else {
        Err(ElabError::IllegalConnection {
            a: circuit.signal_path(a, interner),
            b: circuit.signal_path(b, interner),
        })
    }
}

/// Expands an interface binding into pairwise port merges and, for method
/// roles, a call edge.
fn expand_iface(
    circuit: &Circuit,
    interner: &Interner,
    a: IfaceId,
    b: IfaceId,
    uf: &mut UnionFind<u32>,
    call_edges: &mut Vec<CallEdge>,
) -> Result<(), ElabError> {
    let ia = &circuit.ifaces[a];
    let ib = &circuit.ifaces[b];

    if ia.role.complement() != ib.role {
        return Err(ElabError::RoleMismatch {
            a: circuit.iface_path(a, interner),
            b: circuit.iface_path(b, interner),
        });
    }

    // Bind every complementary pair at matching names. Unmatched ports stay
    // floating here; the global required-port check catches the fatal cases.
    for &pa in &ia.ports {
        let name = circuit.signals[pa].name;
        let matched = ib
            .ports
            .iter()
            .copied()
            .find(|&pb| circuit.signals[pb].name == name);
        if let Some(pb) = matched {
            let ka = circuit.signals[pa].kind;
            let kb = circuit.signals[pb].kind;
            let complementary = matches!(
                (ka, kb),
                (SignalKind::Output, SignalKind::Input) | (SignalKind::Input, SignalKind::Output)
            );
            if !complementary {
                return Err(ElabError::DirectionConflict {
                    a: circuit.signal_path(pa, interner),
                    b: circuit.signal_path(pb, interner),
                });
            }
            uf.union(pa.as_raw(), pb.as_raw());
        }
    }

    if ia.role.is_method() {
        let (caller_if, callee_if) = if ia.role == IfaceRole::Caller {
            (a, b)
        } else {
            (b, a)
        };
        let caller = circuit.ifaces[caller_if]
            .method
            .ok_or_else(|| ElabError::MissingMethod {
                iface: circuit.iface_path(caller_if, interner),
            })?;
        let callee = circuit.ifaces[callee_if]
            .method
            .ok_or_else(|| ElabError::MissingMethod {
                iface: circuit.iface_path(callee_if, interner),
            })?;
        call_edges.push(CallEdge { caller, callee });
    }

    Ok(())
}
