//! Constraint collection: deriving the complete ordering relation.
//!
//! Implicit constraints come from read/write overlap on shared nets: a
//! combinational writer orders before every reader of its net. A sequential
//! writer targets the net's *next-value* projection, so it emits no implicit
//! edge toward current-value readers; registers legitimately break
//! combinational cycles this way. Explicit constraints are author-declared;
//! `SamePhase` constraints merge units into indivisible phase groups before
//! any edges are laid down.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use kairos_common::Interner;
use kairos_ir::{Circuit, ConstraintKind, NetId, UnitId};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::errors::ElabError;
use crate::netlist::Netlist;

/// Where an ordering edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// Derived from read/write overlap on a net.
    Implicit,
    /// Author-declared `Before` constraint.
    Explicit,
    /// A method binding's directed call edge.
    Call,
}

/// One ordering edge between two phase-group representatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEdge {
    /// The representative that must run first.
    pub before: UnitId,
    /// The representative that must run after.
    pub after: UnitId,
    /// Edge origin, kept for diagnostics.
    pub why: Provenance,
}

/// The combined constraint relation over all schedulable units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintSet {
    /// Deduplicated ordering edges between phase-group representatives.
    pub edges: Vec<OrderEdge>,
    /// Phase-group representative of each unit, indexed by raw unit id.
    rep: Vec<UnitId>,
    /// Net-projected read set per unit, indexed by raw unit id.
    pub unit_reads: Vec<Vec<NetId>>,
    /// Net-projected write set per unit, indexed by raw unit id.
    pub unit_writes: Vec<Vec<NetId>>,
}

impl ConstraintSet {
    /// Returns the phase-group representative of a unit (itself, unless the
    /// unit was merged by a `SamePhase` constraint).
    pub fn rep_of(&self, unit: UnitId) -> UnitId {
        self.rep[unit.as_raw() as usize]
    }

    /// Returns phase groups keyed by representative, members in id order.
    pub fn groups(&self) -> BTreeMap<UnitId, Vec<UnitId>> {
        let mut groups: BTreeMap<UnitId, Vec<UnitId>> = BTreeMap::new();
        for (raw, &rep) in self.rep.iter().enumerate() {
            groups.entry(rep).or_default().push(UnitId::from_raw(raw as u32));
        }
        groups
    }
}

/// Collects the full constraint set for a resolved circuit.
pub fn collect(
    circuit: &Circuit,
    netlist: &Netlist,
    interner: &Interner,
) -> Result<ConstraintSet, ElabError> {
    let unit_count = circuit.units.len();
    let net_count = netlist.nets.len();

    // Project declared signal sets onto nets.
    let mut unit_reads = Vec::with_capacity(unit_count);
    let mut unit_writes = Vec::with_capacity(unit_count);
    for (_, unit) in circuit.units.iter() {
        let reads: BTreeSet<NetId> = unit.reads.iter().map(|&s| netlist.net_of(s)).collect();
        let writes: BTreeSet<NetId> = unit.writes.iter().map(|&s| netlist.net_of(s)).collect();
        unit_reads.push(reads.into_iter().collect::<Vec<_>>());
        unit_writes.push(writes.into_iter().collect::<Vec<_>>());
    }

    // Writers and readers per net. Immediate writers overwrite the current
    // value; pending writers target the next-value projection.
    let mut immediate_writers: Vec<Vec<UnitId>> = vec![Vec::new(); net_count];
    let mut pending_writers: Vec<Vec<UnitId>> = vec![Vec::new(); net_count];
    let mut readers: Vec<Vec<UnitId>> = vec![Vec::new(); net_count];
    for (unit, record) in circuit.units.iter() {
        for &net in &unit_writes[unit.as_raw() as usize] {
            if record.kind.writes_immediately() {
                immediate_writers[net.as_raw() as usize].push(unit);
            } else {
                pending_writers[net.as_raw() as usize].push(unit);
            }
        }
        for &net in &unit_reads[unit.as_raw() as usize] {
            readers[net.as_raw() as usize].push(unit);
        }
    }

    // A net tolerates at most one writer in total: a second combinational
    // driver, a second register, or a comb/register mix would all leave the
    // net's value dependent on execution order.
    for net in netlist.nets.ids() {
        let raw = net.as_raw() as usize;
        let total = immediate_writers[raw].len() + pending_writers[raw].len();
        if total > 1 {
            let mut units: Vec<UnitId> = immediate_writers[raw]
                .iter()
                .chain(pending_writers[raw].iter())
                .copied()
                .collect();
            units.sort_unstable();
            let drivers = units
                .iter()
                .map(|&u| circuit.unit_path(u, interner))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ElabError::MultipleDrivers {
                net: circuit.signal_path(netlist.nets[net].signals[0], interner),
                drivers,
                units,
            });
        }
    }

    // Merge SamePhase groups; the representative is the smallest member id.
    let mut uf = UnionFind::<u32>::new(unit_count);
    for c in &circuit.constraints {
        if c.kind == ConstraintKind::SamePhase {
            uf.union(c.first.as_raw(), c.second.as_raw());
        }
    }
    let mut min_of_root: BTreeMap<u32, u32> = BTreeMap::new();
    for u in 0..unit_count as u32 {
        min_of_root.entry(uf.find(u)).or_insert(u);
    }
    let rep: Vec<UnitId> = (0..unit_count as u32)
        .map(|u| UnitId::from_raw(min_of_root[&uf.find(u)]))
        .collect();

    let mut edges = Vec::new();
    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut push_edge = |edges: &mut Vec<OrderEdge>, before: UnitId, after: UnitId, why| {
        if seen.insert((before.as_raw(), after.as_raw())) {
            edges.push(OrderEdge { before, after, why });
        }
    };

    // Explicit Before constraints, with contradiction detection.
    let mut explicit: HashSet<(u32, u32)> = HashSet::new();
    for c in &circuit.constraints {
        if c.kind != ConstraintKind::Before {
            continue;
        }
        let a = rep[c.first.as_raw() as usize];
        let b = rep[c.second.as_raw() as usize];
        if a == b || explicit.contains(&(b.as_raw(), a.as_raw())) {
            return Err(ElabError::ConstraintConflict {
                a: circuit.unit_path(c.first, interner),
                b: circuit.unit_path(c.second, interner),
            });
        }
        explicit.insert((a.as_raw(), b.as_raw()));
        push_edge(&mut edges, a, b, Provenance::Explicit);
    }

    // Call edges: the caller runs before the callee's method body.
    for ce in &netlist.call_edges {
        let a = rep[ce.caller.as_raw() as usize];
        let b = rep[ce.callee.as_raw() as usize];
        if a != b {
            push_edge(&mut edges, a, b, Provenance::Call);
        }
    }

    // Implicit writer-before-reader edges. Pending (sequential) writers emit
    // nothing: their readers see last cycle's committed value.
    for net in netlist.nets.ids() {
        let raw = net.as_raw() as usize;
        if let Some(&writer) = immediate_writers[raw].first() {
            for &reader in &readers[raw] {
                if reader == writer {
                    continue;
                }
                let a = rep[writer.as_raw() as usize];
                let b = rep[reader.as_raw() as usize];
                if a != b {
                    push_edge(&mut edges, a, b, Provenance::Implicit);
                }
            }
        }
    }

    Ok(ConstraintSet {
        edges,
        rep,
        unit_reads,
        unit_writes,
    })
}
