//! Deterministic topological scheduling of the constraint graph.
//!
//! Nodes are phase-group representatives; edges are `before` constraints.
//! Kahn's algorithm with a min-heap on representative id guarantees that two
//! runs over the same constraint set produce byte-identical orders, which in
//! turn makes simulation traces reproducible and diffable. Cycles are
//! extracted once, at elaboration, never re-checked per cycle of simulation.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use kairos_common::Interner;
use kairos_ir::{Circuit, UnitId};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintSet;
use crate::errors::ElabError;

/// The single, statically computed execution order.
///
/// Computed once during elaboration and replayed unchanged every simulation
/// cycle, so execution cost stays linear in the number of units regardless
/// of circuit depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// All schedulable units in execution order.
    pub order: Vec<UnitId>,
}

/// Computes the schedule for a collected constraint set.
pub fn schedule(
    circuit: &Circuit,
    cset: &ConstraintSet,
    interner: &Interner,
) -> Result<Schedule, ElabError> {
    let groups = cset.groups();

    let mut graph: DiGraph<UnitId, ()> = DiGraph::new();
    let mut node_of: HashMap<UnitId, NodeIndex> = HashMap::new();
    for &rep in groups.keys() {
        let node = graph.add_node(rep);
        node_of.insert(rep, node);
    }
    for edge in &cset.edges {
        graph.add_edge(node_of[&edge.before], node_of[&edge.after], ());
    }

    // Kahn's algorithm, always selecting the smallest ready representative.
    let mut indegree: HashMap<NodeIndex, usize> = graph
        .node_indices()
        .map(|n| (n, graph.neighbors_directed(n, Direction::Incoming).count()))
        .collect();
    let mut ready: BinaryHeap<Reverse<u32>> = indegree
        .iter()
        .filter(|&(_, &d)| d == 0)
        .map(|(&n, _)| Reverse(graph[n].as_raw()))
        .collect();

    let mut order = Vec::with_capacity(circuit.units.len());
    let mut scheduled_groups = 0usize;
    while let Some(Reverse(raw)) = ready.pop() {
        let rep = UnitId::from_raw(raw);
        scheduled_groups += 1;
        order.extend(groups[&rep].iter().copied());
        for succ in graph.neighbors_directed(node_of[&rep], Direction::Outgoing) {
            let d = indegree.get_mut(&succ).unwrap();
            *d -= 1;
            if *d == 0 {
                ready.push(Reverse(graph[succ].as_raw()));
            }
        }
    }

    if scheduled_groups < groups.len() {
        // Everything left unscheduled sits on or behind a cycle; report the
        // cycles themselves.
        let mut units: Vec<UnitId> = Vec::new();
        for scc in tarjan_scc(&graph) {
            if scc.len() > 1 {
                for node in scc {
                    units.extend(groups[&graph[node]].iter().copied());
                }
            }
        }
        units.sort_unstable();
        let cycle = units
            .iter()
            .map(|&u| circuit.unit_path(u, interner))
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(ElabError::CombinationalLoop { cycle, units });
    }

    Ok(Schedule { order })
}
