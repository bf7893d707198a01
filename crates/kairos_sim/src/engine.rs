//! The cycle-based execution engine.
//!
//! [`SimEngine`] flattens the elaborated design into per-net state, then
//! replays the static schedule every [`tick`](SimEngine::tick): one
//! evaluation pass over every schedulable unit, followed by one commit of
//! all pending register writes. A tick is the unit of atomicity: nothing
//! observes state between the two phases. Execution is single-threaded; the
//! schedule has already linearized every dependency, so correctness needs
//! no runtime locking.

use kairos_common::{Bits, Interner};
use kairos_elaborate::Elaboration;
use kairos_ir::{Circuit, NetId, SignalId, UnitId, UnitKind};

use crate::body::{BodyEntry, BodyShape, UnitBodies};
use crate::error::SimError;
use crate::scope::EvalScope;
use crate::state::{NetState, UnitAccess};

/// The simulation engine: flat net state plus the fixed schedule.
///
/// Construct via [`SimEngine::new`] from an elaborated circuit, then drive
/// with [`tick`](SimEngine::tick), [`peek`](SimEngine::peek), and
/// [`poke`](SimEngine::poke).
#[derive(Debug)]
pub struct SimEngine {
    nets: Vec<NetState>,
    signal_net: Vec<NetId>,
    units: Vec<UnitAccess>,
    schedule: Vec<UnitId>,
    bodies: UnitBodies,
    cycles: u64,
}

impl SimEngine {
    /// Builds an engine from an elaborated circuit and its unit bodies.
    ///
    /// Verifies that every scheduled unit has a body of the matching shape:
    /// an update body for combinational/sequential units, a guard/call pair
    /// for method-call units.
    pub fn new(
        circuit: &Circuit,
        elab: &Elaboration,
        bodies: UnitBodies,
        interner: &Interner,
    ) -> Result<Self, SimError> {
        let nets: Vec<NetState> = elab
            .netlist
            .nets
            .values()
            .map(|net| {
                NetState::new(
                    circuit.signal_path(net.signals[0], interner),
                    net.width,
                    net.pokeable,
                )
            })
            .collect();
        let signal_net: Vec<NetId> = circuit
            .signals
            .ids()
            .map(|s| elab.netlist.net_of(s))
            .collect();
        let units: Vec<UnitAccess> = circuit
            .units
            .iter()
            .map(|(id, u)| UnitAccess {
                id,
                name: circuit.unit_path(id, interner),
                kind: u.kind,
                reads: elab.constraints.unit_reads[id.as_raw() as usize].clone(),
                writes: elab.constraints.unit_writes[id.as_raw() as usize].clone(),
            })
            .collect();

        for &unit in &elab.schedule.order {
            let access = &units[unit.as_raw() as usize];
            let expected = if access.kind == UnitKind::MethodCall {
                BodyShape::Method
            } else {
                BodyShape::Update
            };
            match bodies.shape_of(unit) {
                None => {
                    return Err(SimError::MissingBody {
                        unit: access.name.clone(),
                    })
                }
                Some(shape) if shape != expected => {
                    return Err(SimError::WrongBodyKind {
                        unit: access.name.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            nets,
            signal_net,
            units,
            schedule: elab.schedule.order.clone(),
            bodies,
            cycles: 0,
        })
    }

    /// Advances the simulation by exactly one cycle.
    ///
    /// Evaluation phase: every scheduled unit runs once, in order. A
    /// combinational write is visible to every later unit in the same pass;
    /// a sequential write is buffered. Commit phase: every buffered value
    /// atomically becomes current.
    ///
    /// A body error aborts the tick immediately; engine state is
    /// unspecified afterwards and the cycle counter does not advance.
    pub fn tick(&mut self) -> Result<(), SimError> {
        let Self {
            nets,
            signal_net,
            units,
            schedule,
            bodies,
            ..
        } = self;

        for &unit in schedule.iter() {
            let access = &units[unit.as_raw() as usize];
            let entry = match bodies.entry_mut(unit) {
                Some(entry) => entry,
                None => {
                    return Err(SimError::MissingBody {
                        unit: access.name.clone(),
                    })
                }
            };
            let mut scope = EvalScope {
                nets: nets.as_mut_slice(),
                signal_net: signal_net.as_slice(),
                unit: access,
            };
            match entry {
                BodyEntry::Update(body) => body(&mut scope)?,
                BodyEntry::Method { guard, call } => {
                    if let Some(guard) = guard {
                        guard(&mut scope)?;
                    }
                    call(&mut scope)?;
                }
            }
        }

        for net in nets.iter_mut() {
            if let Some(pending) = net.pending.take() {
                net.current = pending;
            }
        }

        self.cycles += 1;
        Ok(())
    }

    /// Returns the net a signal was merged into.
    pub fn net_of(&self, sig: SignalId) -> NetId {
        self.signal_net[sig.as_raw() as usize]
    }

    /// Returns the current committed value of a net.
    ///
    /// # Panics
    ///
    /// Panics if the net id is out of bounds.
    pub fn peek(&self, net: NetId) -> &Bits {
        &self.nets[net.as_raw() as usize].current
    }

    /// Convenience: [`peek`](SimEngine::peek) through a signal.
    pub fn peek_signal(&self, sig: SignalId) -> &Bits {
        self.peek(self.net_of(sig))
    }

    /// Directly sets a net's current value, bypassing the commit phase.
    ///
    /// Only legal on nets containing a top-level port; this is the
    /// testbench driving contract, not a general mutation path.
    pub fn poke(&mut self, net: NetId, value: Bits) -> Result<(), SimError> {
        let state = &mut self.nets[net.as_raw() as usize];
        if !state.pokeable {
            return Err(SimError::PokeForbidden {
                net: state.name.clone(),
            });
        }
        state.current = Bits::from_bits(state.width, &value)?;
        Ok(())
    }

    /// Convenience: [`poke`](SimEngine::poke) through a signal.
    pub fn poke_signal(&mut self, sig: SignalId, value: Bits) -> Result<(), SimError> {
        self.poke(self.net_of(sig), value)
    }

    /// Number of completed cycles.
    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }

    /// Number of flattened nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Number of schedulable units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairos_elaborate::elaborate;
    use kairos_ir::IfaceRole;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fixture() -> (Interner, Circuit) {
        let interner = Interner::new();
        let circuit = Circuit::new(interner.intern("top"));
        (interner, circuit)
    }

    fn build(
        ckt: &Circuit,
        interner: &Interner,
        bodies: UnitBodies,
    ) -> Result<SimEngine, SimError> {
        let elab = elaborate(ckt, interner).unwrap();
        SimEngine::new(ckt, &elab, bodies, interner)
    }

    #[test]
    fn adder_computes_on_tick() {
        let (i, mut ckt) = fixture();
        let a = ckt.add_input(ckt.root, i.intern("a"), 8);
        let b = ckt.add_input(ckt.root, i.intern("b"), 8);
        let sum = ckt.add_output(ckt.root, i.intern("sum"), 8);
        let u = ckt.add_update(
            ckt.root,
            i.intern("add"),
            UnitKind::Combinational,
            &[a, b],
            &[sum],
        );
        let mut bodies = UnitBodies::new();
        bodies.set(
            u,
            Box::new(move |s| {
                let va = s.read(a)?;
                let vb = s.read(b)?;
                s.write(sum, &va + &vb)
            }),
        );
        let mut engine = build(&ckt, &i, bodies).unwrap();
        engine.poke_signal(a, Bits::from_int(8, 2).unwrap()).unwrap();
        engine.poke_signal(b, Bits::from_int(8, 3).unwrap()).unwrap();
        engine.tick().unwrap();
        assert_eq!(engine.peek_signal(sum).to_u64(), Some(5));
        assert_eq!(engine.cycle_count(), 1);
    }

    #[test]
    fn blocking_writes_visible_within_pass() {
        // Declared reader-first: the schedule must still run the writer
        // first, and its write must be visible to the chained unit.
        let (i, mut ckt) = fixture();
        let x = ckt.add_wire(ckt.root, i.intern("x"), 8);
        let y = ckt.add_output(ckt.root, i.intern("y"), 8);
        let chain = ckt.add_update(
            ckt.root,
            i.intern("chain"),
            UnitKind::Combinational,
            &[x],
            &[y],
        );
        let drive = ckt.add_update(
            ckt.root,
            i.intern("drive"),
            UnitKind::Combinational,
            &[],
            &[x],
        );
        let mut bodies = UnitBodies::new();
        bodies.set(
            chain,
            Box::new(move |s| {
                let vx = s.read(x)?;
                s.write(y, &vx + &Bits::from_int(8, 1)?)
            }),
        );
        bodies.set(drive, Box::new(move |s| s.write(x, Bits::from_int(8, 1)?)));
        let mut engine = build(&ckt, &i, bodies).unwrap();
        engine.tick().unwrap();
        assert_eq!(engine.peek_signal(y).to_u64(), Some(2));
    }

    #[test]
    fn register_commits_at_cycle_end() {
        let (i, mut ckt) = fixture();
        let d = ckt.add_input(ckt.root, i.intern("d"), 8);
        let q = ckt.add_output(ckt.root, i.intern("q"), 8);
        let ff = ckt.add_update(ckt.root, i.intern("ff"), UnitKind::Sequential, &[d], &[q]);
        let mut bodies = UnitBodies::new();
        bodies.set(
            ff,
            Box::new(move |s| {
                let vd = s.read(d)?;
                s.write_next(q, vd)
            }),
        );
        let mut engine = build(&ckt, &i, bodies).unwrap();
        engine.poke_signal(d, Bits::from_int(8, 5).unwrap()).unwrap();
        assert_eq!(engine.peek_signal(q).to_u64(), Some(0));
        engine.tick().unwrap();
        assert_eq!(engine.peek_signal(q).to_u64(), Some(5));
    }

    #[test]
    fn commit_with_no_pending_changes_nothing() {
        let (i, mut ckt) = fixture();
        let x = ckt.add_input(ckt.root, i.intern("x"), 8);
        let mut engine = build(&ckt, &i, UnitBodies::new()).unwrap();
        engine.poke_signal(x, Bits::from_int(8, 9).unwrap()).unwrap();
        engine.tick().unwrap();
        engine.tick().unwrap();
        assert_eq!(engine.peek_signal(x).to_u64(), Some(9));
    }

    #[test]
    fn missing_body_rejected_at_construction() {
        let (i, mut ckt) = fixture();
        ckt.add_update(ckt.root, i.intern("u"), UnitKind::Combinational, &[], &[]);
        let err = build(&ckt, &i, UnitBodies::new()).unwrap_err();
        assert_eq!(
            err,
            SimError::MissingBody {
                unit: "top.u".into()
            }
        );
    }

    #[test]
    fn wrong_body_shape_rejected() {
        let (i, mut ckt) = fixture();
        let u = ckt.add_update(ckt.root, i.intern("m"), UnitKind::MethodCall, &[], &[]);
        let mut bodies = UnitBodies::new();
        bodies.set(u, Box::new(|_| Ok(())));
        let err = build(&ckt, &i, bodies).unwrap_err();
        assert_eq!(
            err,
            SimError::WrongBodyKind {
                unit: "top.m".into()
            }
        );
    }

    #[test]
    fn undeclared_access_aborts_tick() {
        let (i, mut ckt) = fixture();
        let x = ckt.add_wire(ckt.root, i.intern("x"), 8);
        let u = ckt.add_update(ckt.root, i.intern("u"), UnitKind::Combinational, &[], &[]);
        let mut bodies = UnitBodies::new();
        bodies.set(u, Box::new(move |s| s.read(x).map(|_| ())));
        let mut engine = build(&ckt, &i, bodies).unwrap();
        assert!(matches!(
            engine.tick(),
            Err(SimError::UndeclaredAccess { .. })
        ));
        assert_eq!(engine.cycle_count(), 0);
    }

    #[test]
    fn discipline_violation_aborts_tick() {
        let (i, mut ckt) = fixture();
        let x = ckt.add_wire(ckt.root, i.intern("x"), 8);
        let u = ckt.add_update(
            ckt.root,
            i.intern("u"),
            UnitKind::Combinational,
            &[],
            &[x],
        );
        let mut bodies = UnitBodies::new();
        bodies.set(u, Box::new(move |s| s.write_next(x, Bits::new(8))));
        let mut engine = build(&ckt, &i, bodies).unwrap();
        assert!(matches!(
            engine.tick(),
            Err(SimError::NonBlockingInCombinational { .. })
        ));
    }

    #[test]
    fn method_guard_runs_before_call() {
        let (i, mut ckt) = fixture();
        let src = ckt.add_component(ckt.root, i.intern("src"));
        let fifo = ckt.add_component(ckt.root, i.intern("fifo"));
        let slot = ckt.add_wire(fifo, i.intern("slot"), 8);
        let step = ckt.add_update(src, i.intern("step"), UnitKind::Combinational, &[], &[]);
        let enq = ckt.add_update(
            fifo,
            i.intern("enq"),
            UnitKind::MethodCall,
            &[],
            &[slot],
        );
        let caller = ckt.add_iface(src, i.intern("enq"), IfaceRole::Caller);
        ckt.set_iface_method(caller, step);
        let callee = ckt.add_iface(fifo, i.intern("enq"), IfaceRole::Callee);
        ckt.set_iface_method(callee, enq);
        ckt.bind(caller, callee);

        let trace: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let mut bodies = UnitBodies::new();
        let t = trace.clone();
        bodies.set(
            step,
            Box::new(move |_| {
                t.borrow_mut().push("caller");
                Ok(())
            }),
        );
        let tg = trace.clone();
        let tc = trace.clone();
        bodies.set_method(
            enq,
            Some(Box::new(move |_| {
                tg.borrow_mut().push("guard");
                Ok(())
            })),
            Box::new(move |s| {
                tc.borrow_mut().push("call");
                s.write(slot, Bits::from_int(8, 0x2a)?)
            }),
        );
        let mut engine = build(&ckt, &i, bodies).unwrap();
        engine.tick().unwrap();
        assert_eq!(*trace.borrow(), vec!["caller", "guard", "call"]);
        assert_eq!(engine.peek_signal(slot).to_u64(), Some(0x2a));
    }

    #[test]
    fn poke_rejected_on_internal_net() {
        let (i, mut ckt) = fixture();
        let child = ckt.add_component(ckt.root, i.intern("child"));
        let w = ckt.add_wire(child, i.intern("w"), 8);
        let mut engine = build(&ckt, &i, UnitBodies::new()).unwrap();
        assert!(matches!(
            engine.poke_signal(w, Bits::new(8)),
            Err(SimError::PokeForbidden { .. })
        ));
    }

    #[test]
    fn poke_width_checked() {
        let (i, mut ckt) = fixture();
        let p = ckt.add_input(ckt.root, i.intern("p"), 4);
        let mut engine = build(&ckt, &i, UnitBodies::new()).unwrap();
        assert!(engine
            .poke_signal(p, Bits::from_int(8, 200).unwrap())
            .is_err());
        engine.poke_signal(p, Bits::from_int(4, 7).unwrap()).unwrap();
        assert_eq!(engine.peek_signal(p).to_u64(), Some(7));
    }

    #[test]
    fn counts() {
        let (i, mut ckt) = fixture();
        ckt.add_wire(ckt.root, i.intern("a"), 8);
        ckt.add_wire(ckt.root, i.intern("b"), 8);
        let engine = build(&ckt, &i, UnitBodies::new()).unwrap();
        assert_eq!(engine.net_count(), 2);
        assert_eq!(engine.unit_count(), 0);
    }
}
