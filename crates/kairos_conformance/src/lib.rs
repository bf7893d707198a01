//! Shared helpers for Kairos conformance tests.
//!
//! Provides a small bench wrapper (interner + circuit + one-call engine
//! construction) and builders for the standard scenario circuits used across
//! the integration tests.

#![warn(missing_docs)]

use kairos_common::{Bits, Interner};
use kairos_elaborate::{elaborate, ElabError, Elaboration};
use kairos_ir::{Circuit, IfaceRole, SignalId, UnitKind};
use kairos_sim::{SimEngine, UnitBodies};

/// An interner/circuit pair under construction.
pub struct Bench {
    /// The name interner shared by the circuit and all diagnostics.
    pub interner: Interner,
    /// The circuit description.
    pub circuit: Circuit,
}

/// Creates a bench with a root component of the given name.
pub fn bench(root: &str) -> Bench {
    let interner = Interner::new();
    let circuit = Circuit::new(interner.intern(root));
    Bench { interner, circuit }
}

impl Bench {
    /// Runs the elaboration pipeline.
    pub fn elaborate(&self) -> Result<Elaboration, ElabError> {
        elaborate(&self.circuit, &self.interner)
    }

    /// Elaborates and builds an engine, panicking on any failure.
    pub fn engine(&self, bodies: UnitBodies) -> SimEngine {
        let elab = self.elaborate().unwrap();
        SimEngine::new(&self.circuit, &elab, bodies, &self.interner).unwrap()
    }
}

/// Signal handles of the ready/valid pipeline scenario.
pub struct HandshakeSignals {
    /// Producer-side send index register.
    pub idx: SignalId,
    /// Consumer buffer-occupied register.
    pub full: SignalId,
    /// Consumer received-value counter register.
    pub count: SignalId,
    /// Consumer buffer register.
    pub buf: SignalId,
}

/// Builds the producer / one-element-buffer consumer handshake circuit.
///
/// The producer emits `values` through a ready/valid `Send`/`Recv` interface
/// pair; the consumer buffers one element per cycle and counts everything
/// it drains. With four values, the counter reaches 4 after exactly 5 cycles
/// (4 values plus one pipeline-fill cycle).
pub fn ready_valid_pipeline(values: &[u64]) -> (Bench, UnitBodies, HandshakeSignals) {
    assert!(values.len() <= 7, "send index register is 3 bits");
    let mut bench = bench("top");
    let i = &bench.interner;
    let ckt = &mut bench.circuit;
    let root = ckt.root;

    let prod = ckt.add_component(root, i.intern("prod"));
    let p_msg = ckt.add_output(prod, i.intern("msg"), 8);
    let p_val = ckt.add_output(prod, i.intern("val"), 1);
    let p_rdy = ckt.add_input(prod, i.intern("rdy"), 1);
    let idx = ckt.add_wire(prod, i.intern("idx"), 3);

    let cons = ckt.add_component(root, i.intern("cons"));
    let c_msg = ckt.add_input(cons, i.intern("msg"), 8);
    let c_val = ckt.add_input(cons, i.intern("val"), 1);
    let c_rdy = ckt.add_output(cons, i.intern("rdy"), 1);
    let buf = ckt.add_wire(cons, i.intern("buf"), 8);
    let full = ckt.add_wire(cons, i.intern("full"), 1);
    let count = ckt.add_wire(cons, i.intern("count"), 3);

    let send = ckt.add_iface(prod, i.intern("out"), IfaceRole::Send);
    ckt.add_iface_port(send, p_msg);
    ckt.add_iface_port(send, p_val);
    ckt.add_iface_port(send, p_rdy);
    let recv = ckt.add_iface(cons, i.intern("in"), IfaceRole::Recv);
    ckt.add_iface_port(recv, c_msg);
    ckt.add_iface_port(recv, c_val);
    ckt.add_iface_port(recv, c_rdy);
    ckt.bind(send, recv);

    let prod_out = ckt.add_update(
        prod,
        i.intern("emit"),
        UnitKind::Combinational,
        &[idx],
        &[p_msg, p_val],
    );
    let prod_step = ckt.add_update(
        prod,
        i.intern("step"),
        UnitKind::Sequential,
        &[idx, p_val, p_rdy],
        &[idx],
    );
    let cons_rdy = ckt.add_update(
        cons,
        i.intern("accept"),
        UnitKind::Combinational,
        &[],
        &[c_rdy],
    );
    let cons_step = ckt.add_update(
        cons,
        i.intern("step"),
        UnitKind::Sequential,
        &[c_msg, c_val, full, count],
        &[buf, full, count],
    );

    let mut bodies = UnitBodies::new();
    let sent: Vec<u64> = values.to_vec();
    bodies.set(
        prod_out,
        Box::new(move |s| {
            let at = s.read(idx)?.to_u64().unwrap() as usize;
            if at < sent.len() {
                s.write(p_msg, Bits::from_int(8, sent[at] as i128)?)?;
                s.write(p_val, Bits::from_int(1, 1)?)?;
            } else {
                s.write(p_msg, Bits::new(8))?;
                s.write(p_val, Bits::new(1))?;
            }
            Ok(())
        }),
    );
    bodies.set(
        prod_step,
        Box::new(move |s| {
            let fired = !s.read(p_val)?.is_zero() && !s.read(p_rdy)?.is_zero();
            if fired {
                let cur = s.read(idx)?;
                s.write_next(idx, &cur + &Bits::from_int(3, 1)?)?;
            }
            Ok(())
        }),
    );
    bodies.set(cons_rdy, Box::new(move |s| s.write(c_rdy, Bits::from_int(1, 1)?)));
    bodies.set(
        cons_step,
        Box::new(move |s| {
            // Drain the buffered element, then latch the incoming one.
            if !s.read(full)?.is_zero() {
                let c = s.read(count)?;
                s.write_next(count, &c + &Bits::from_int(3, 1)?)?;
            }
            let val = s.read(c_val)?;
            if !val.is_zero() {
                let msg = s.read(c_msg)?;
                s.write_next(buf, msg)?;
            }
            s.write_next(full, val)?;
            Ok(())
        }),
    );

    (
        bench,
        bodies,
        HandshakeSignals {
            idx,
            full,
            count,
            buf,
        },
    )
}
