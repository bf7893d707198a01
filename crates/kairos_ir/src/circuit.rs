//! The top-level circuit description and its registration API.
//!
//! A [`Circuit`] is built once, before elaboration, through explicit
//! registration calls; there is no reflective discovery of children or
//! signals. After elaboration the description is static, and the engine
//! supports no runtime rewiring.

use crate::arena::Arena;
use crate::component::Component;
use crate::connect::{Connection, ConstraintKind, OrderConstraint};
use crate::iface::{Interface, IfaceRole};
use crate::ids::{ComponentId, IfaceId, SignalId, UnitId};
use crate::signal::{Signal, SignalKind};
use crate::unit::{SchedUnit, UnitKind};
use kairos_common::{bounds, Ident, Interner};
use serde::{Deserialize, Serialize};

/// A complete declarative circuit description.
///
/// All entities live in flat arenas and reference each other by id. The
/// structure is pure data: executable unit bodies are registered separately
/// with the simulation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// All components; index 0 is the root.
    pub components: Arena<ComponentId, Component>,
    /// All signals across all components.
    pub signals: Arena<SignalId, Signal>,
    /// All interface bundles.
    pub ifaces: Arena<IfaceId, Interface>,
    /// All schedulable units.
    pub units: Arena<UnitId, SchedUnit>,
    /// Declared connections, processed during connectivity resolution.
    pub connections: Vec<Connection>,
    /// Author-declared ordering constraints.
    pub constraints: Vec<OrderConstraint>,
    /// The root component.
    pub root: ComponentId,
}

impl Circuit {
    /// Creates a circuit containing only the root component.
    pub fn new(root_name: Ident) -> Self {
        let mut components = Arena::new();
        let root = components.alloc_with(|id| Component::new(id, root_name, None));
        Self {
            components,
            signals: Arena::new(),
            ifaces: Arena::new(),
            units: Arena::new(),
            connections: Vec::new(),
            constraints: Vec::new(),
            root,
        }
    }

    /// Registers a named child component.
    pub fn add_component(&mut self, parent: ComponentId, name: Ident) -> ComponentId {
        let id = self
            .components
            .alloc_with(|id| Component::new(id, name, Some(parent)));
        self.components[parent].children.push(id);
        id
    }

    /// Registers a child-array entry, rendered as `name[index]` in paths.
    pub fn add_component_indexed(
        &mut self,
        parent: ComponentId,
        name: Ident,
        index: u32,
    ) -> ComponentId {
        let id = self.components.alloc_with(|id| {
            let mut c = Component::new(id, name, Some(parent));
            c.index = Some(index);
            c
        });
        self.components[parent].children.push(id);
        id
    }

    fn add_signal(
        &mut self,
        owner: ComponentId,
        name: Ident,
        width: u32,
        kind: SignalKind,
    ) -> SignalId {
        bounds::check_width(width);
        let id = self.signals.alloc_with(|id| Signal {
            id,
            name,
            owner,
            width,
            kind,
            required: false,
        });
        self.components[owner].signals.push(id);
        id
    }

    /// Registers an input port.
    pub fn add_input(&mut self, owner: ComponentId, name: Ident, width: u32) -> SignalId {
        self.add_signal(owner, name, width, SignalKind::Input)
    }

    /// Registers an output port.
    pub fn add_output(&mut self, owner: ComponentId, name: Ident, width: u32) -> SignalId {
        self.add_signal(owner, name, width, SignalKind::Output)
    }

    /// Registers an internal wire.
    pub fn add_wire(&mut self, owner: ComponentId, name: Ident, width: u32) -> SignalId {
        self.add_signal(owner, name, width, SignalKind::Wire)
    }

    /// Marks a signal as required: leaving it unconnected after resolution
    /// is a fatal elaboration error.
    pub fn mark_required(&mut self, signal: SignalId) {
        self.signals[signal].required = true;
    }

    /// Registers an interface bundle.
    pub fn add_iface(&mut self, owner: ComponentId, name: Ident, role: IfaceRole) -> IfaceId {
        let id = self.ifaces.alloc_with(|id| Interface {
            id,
            name,
            owner,
            role,
            ports: Vec::new(),
            method: None,
        });
        self.components[owner].ifaces.push(id);
        id
    }

    /// Adds a member port to an interface.
    ///
    /// # Panics
    ///
    /// Panics if the signal is not a port of the interface's owner.
    pub fn add_iface_port(&mut self, iface: IfaceId, signal: SignalId) {
        let owner = self.ifaces[iface].owner;
        let s = &self.signals[signal];
        assert!(
            s.owner == owner && s.kind.is_port(),
            "interface member must be a port of the owning component"
        );
        self.ifaces[iface].ports.push(signal);
    }

    /// Attaches the unit side of a method interface: the calling unit for a
    /// `Caller`, the method-call unit for a `Callee`.
    ///
    /// # Panics
    ///
    /// Panics if the unit belongs to a different component.
    pub fn set_iface_method(&mut self, iface: IfaceId, unit: UnitId) {
        let owner = self.ifaces[iface].owner;
        assert!(
            self.units[unit].owner == owner,
            "interface method unit must belong to the owning component"
        );
        self.ifaces[iface].method = Some(unit);
    }

    /// Registers a schedulable unit with its declared read and write sets.
    ///
    /// The sets may reference the owner's own signals and its children's
    /// ports. They are sorted and deduplicated on registration.
    ///
    /// # Panics
    ///
    /// Panics if a referenced signal is not accessible from `owner`.
    pub fn add_update(
        &mut self,
        owner: ComponentId,
        name: Ident,
        kind: UnitKind,
        reads: &[SignalId],
        writes: &[SignalId],
    ) -> UnitId {
        for &sig in reads.iter().chain(writes.iter()) {
            self.check_access(owner, sig);
        }
        let mut reads = reads.to_vec();
        reads.sort_unstable();
        reads.dedup();
        let mut writes = writes.to_vec();
        writes.sort_unstable();
        writes.dedup();
        let id = self.units.alloc_with(|id| SchedUnit {
            id,
            name,
            owner,
            kind,
            reads,
            writes,
        });
        self.components[owner].units.push(id);
        id
    }

    /// Registers a method-call unit: the schedulable form of a callee-side
    /// method binding. At runtime it carries two bodies (guard and call),
    /// supplied to the engine separately.
    pub fn add_method(
        &mut self,
        owner: ComponentId,
        name: Ident,
        reads: &[SignalId],
        writes: &[SignalId],
    ) -> UnitId {
        self.add_update(owner, name, UnitKind::MethodCall, reads, writes)
    }

    fn check_access(&self, owner: ComponentId, sig: SignalId) {
        let s = &self.signals[sig];
        let accessible = s.owner == owner
            || (s.kind.is_port() && self.components[s.owner].parent == Some(owner));
        assert!(
            accessible,
            "unit may only access its component's signals or its children's ports"
        );
    }

    /// Declares a pairwise signal connection.
    pub fn connect(&mut self, a: SignalId, b: SignalId) {
        self.connections.push(Connection::Wire { a, b });
    }

    /// Declares an interface-level binding.
    pub fn bind(&mut self, a: IfaceId, b: IfaceId) {
        self.connections.push(Connection::Interface { a, b });
    }

    /// Declares an explicit ordering: `first` executes before `second`.
    pub fn order(&mut self, first: UnitId, second: UnitId) {
        self.constraints.push(OrderConstraint {
            kind: ConstraintKind::Before,
            first,
            second,
        });
    }

    /// Declares two units inseparable: they schedule as one phase group.
    pub fn same_phase(&mut self, a: UnitId, b: UnitId) {
        self.constraints.push(OrderConstraint {
            kind: ConstraintKind::SamePhase,
            first: a,
            second: b,
        });
    }

    /// Looks up a direct child by name (and optional array index).
    pub fn child_by_name(
        &self,
        parent: ComponentId,
        name: Ident,
        index: Option<u32>,
    ) -> Option<ComponentId> {
        self.components[parent]
            .children
            .iter()
            .copied()
            .find(|&c| self.components[c].name == name && self.components[c].index == index)
    }

    /// Renders the dotted hierarchical path of a component.
    pub fn component_path(&self, comp: ComponentId, interner: &Interner) -> String {
        let mut parts = Vec::new();
        let mut cursor = Some(comp);
        while let Some(c) = cursor {
            let record = &self.components[c];
            let name = interner.resolve(record.name);
            parts.push(match record.index {
                Some(i) => format!("{name}[{i}]"),
                None => name.to_string(),
            });
            cursor = record.parent;
        }
        parts.reverse();
        parts.join(".")
    }

    /// Renders the hierarchical path of a signal.
    pub fn signal_path(&self, sig: SignalId, interner: &Interner) -> String {
        let s = &self.signals[sig];
        format!(
            "{}.{}",
            self.component_path(s.owner, interner),
            interner.resolve(s.name)
        )
    }

    /// Renders the hierarchical path of a schedulable unit.
    pub fn unit_path(&self, unit: UnitId, interner: &Interner) -> String {
        let u = &self.units[unit];
        format!(
            "{}.{}",
            self.component_path(u.owner, interner),
            interner.resolve(u.name)
        )
    }

    /// Renders the hierarchical path of an interface.
    pub fn iface_path(&self, iface: IfaceId, interner: &Interner) -> String {
        let i = &self.ifaces[iface];
        format!(
            "{}.{}",
            self.component_path(i.owner, interner),
            interner.resolve(i.name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Interner, Circuit) {
        let interner = Interner::new();
        let circuit = Circuit::new(interner.intern("top"));
        (interner, circuit)
    }

    #[test]
    fn new_has_root() {
        let (_, ckt) = fixture();
        assert_eq!(ckt.components.len(), 1);
        assert_eq!(ckt.components[ckt.root].parent, None);
    }

    #[test]
    fn register_children_in_order() {
        let (i, mut ckt) = fixture();
        let a = ckt.add_component(ckt.root, i.intern("a"));
        let b = ckt.add_component(ckt.root, i.intern("b"));
        assert_eq!(ckt.components[ckt.root].children, vec![a, b]);
        assert_eq!(ckt.components[a].parent, Some(ckt.root));
    }

    #[test]
    fn child_lookup() {
        let (i, mut ckt) = fixture();
        let name = i.intern("stage");
        let s0 = ckt.add_component_indexed(ckt.root, name, 0);
        let s1 = ckt.add_component_indexed(ckt.root, name, 1);
        assert_eq!(ckt.child_by_name(ckt.root, name, Some(0)), Some(s0));
        assert_eq!(ckt.child_by_name(ckt.root, name, Some(1)), Some(s1));
        assert_eq!(ckt.child_by_name(ckt.root, name, None), None);
    }

    #[test]
    fn indexed_path_rendering() {
        let (i, mut ckt) = fixture();
        let stage = ckt.add_component_indexed(ckt.root, i.intern("stage"), 2);
        let acc = ckt.add_wire(stage, i.intern("acc"), 8);
        assert_eq!(ckt.component_path(stage, &i), "top.stage[2]");
        assert_eq!(ckt.signal_path(acc, &i), "top.stage[2].acc");
    }

    #[test]
    fn signal_registration() {
        let (i, mut ckt) = fixture();
        let clk = ckt.add_input(ckt.root, i.intern("clk"), 1);
        let out = ckt.add_output(ckt.root, i.intern("out"), 8);
        assert_eq!(ckt.signals[clk].kind, SignalKind::Input);
        assert_eq!(ckt.signals[out].width, 8);
        assert_eq!(ckt.components[ckt.root].signals, vec![clk, out]);
    }

    #[test]
    #[should_panic(expected = "outside supported range")]
    fn zero_width_signal_rejected() {
        let (i, mut ckt) = fixture();
        ckt.add_wire(ckt.root, i.intern("bad"), 0);
    }

    #[test]
    fn mark_required() {
        let (i, mut ckt) = fixture();
        let p = ckt.add_input(ckt.root, i.intern("p"), 1);
        assert!(!ckt.signals[p].required);
        ckt.mark_required(p);
        assert!(ckt.signals[p].required);
    }

    #[test]
    fn update_sets_are_sorted_and_deduped() {
        let (i, mut ckt) = fixture();
        let a = ckt.add_wire(ckt.root, i.intern("a"), 8);
        let b = ckt.add_wire(ckt.root, i.intern("b"), 8);
        let u = ckt.add_update(
            ckt.root,
            i.intern("upd"),
            UnitKind::Combinational,
            &[b, a, b],
            &[a],
        );
        assert_eq!(ckt.units[u].reads, vec![a, b]);
        assert_eq!(ckt.units[u].writes, vec![a]);
    }

    #[test]
    fn update_may_touch_child_ports() {
        let (i, mut ckt) = fixture();
        let child = ckt.add_component(ckt.root, i.intern("child"));
        let port = ckt.add_output(child, i.intern("p"), 4);
        let u = ckt.add_update(
            ckt.root,
            i.intern("watch"),
            UnitKind::Combinational,
            &[port],
            &[],
        );
        assert_eq!(ckt.units[u].reads, vec![port]);
    }

    #[test]
    #[should_panic(expected = "unit may only access")]
    fn update_may_not_touch_child_wires() {
        let (i, mut ckt) = fixture();
        let child = ckt.add_component(ckt.root, i.intern("child"));
        let wire = ckt.add_wire(child, i.intern("w"), 4);
        ckt.add_update(
            ckt.root,
            i.intern("bad"),
            UnitKind::Combinational,
            &[wire],
            &[],
        );
    }

    #[test]
    fn iface_registration() {
        let (i, mut ckt) = fixture();
        let prod = ckt.add_component(ckt.root, i.intern("prod"));
        let msg = ckt.add_output(prod, i.intern("msg"), 8);
        let out = ckt.add_iface(prod, i.intern("out"), IfaceRole::Send);
        ckt.add_iface_port(out, msg);
        assert_eq!(ckt.ifaces[out].ports, vec![msg]);
        assert_eq!(ckt.iface_path(out, &i), "top.prod.out");
    }

    #[test]
    #[should_panic(expected = "interface member must be a port")]
    fn iface_rejects_wires() {
        let (i, mut ckt) = fixture();
        let w = ckt.add_wire(ckt.root, i.intern("w"), 8);
        let out = ckt.add_iface(ckt.root, i.intern("out"), IfaceRole::Send);
        ckt.add_iface_port(out, w);
    }

    #[test]
    fn add_method_registers_method_call_unit() {
        let (i, mut ckt) = fixture();
        let fifo = ckt.add_component(ckt.root, i.intern("fifo"));
        let slot = ckt.add_wire(fifo, i.intern("slot"), 8);
        let enq = ckt.add_method(fifo, i.intern("enq"), &[], &[slot]);
        assert_eq!(ckt.units[enq].kind, UnitKind::MethodCall);
        assert_eq!(ckt.units[enq].writes, vec![slot]);
    }

    #[test]
    fn constraints_recorded() {
        let (i, mut ckt) = fixture();
        let a = ckt.add_update(ckt.root, i.intern("a"), UnitKind::Combinational, &[], &[]);
        let b = ckt.add_update(ckt.root, i.intern("b"), UnitKind::Combinational, &[], &[]);
        ckt.order(a, b);
        ckt.same_phase(a, b);
        assert_eq!(ckt.constraints.len(), 2);
        assert_eq!(ckt.constraints[0].kind, ConstraintKind::Before);
        assert_eq!(ckt.constraints[1].kind, ConstraintKind::SamePhase);
    }

    #[test]
    fn serde_roundtrip() {
        let (i, mut ckt) = fixture();
        let a = ckt.add_wire(ckt.root, i.intern("a"), 8);
        let b = ckt.add_wire(ckt.root, i.intern("b"), 8);
        ckt.connect(a, b);
        let json = serde_json::to_string(&ckt).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.signals.len(), 2);
        assert_eq!(back.connections.len(), 1);
    }
}
