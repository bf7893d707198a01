//! The evaluation scope handed to unit bodies.
//!
//! A body sees exactly three operations: read a current value, write
//! immediately (combinational / method-call units), or write the pending
//! value (sequential units). The scope enforces both the declared
//! read/write sets (the schedule's soundness depends on them) and the
//! assignment discipline of the unit's kind.

use kairos_common::Bits;
use kairos_ir::{NetId, SignalId, UnitKind};

use crate::error::SimError;
use crate::state::{NetState, UnitAccess};

/// Net access for one unit body during the evaluation phase.
pub struct EvalScope<'a> {
    pub(crate) nets: &'a mut [NetState],
    pub(crate) signal_net: &'a [NetId],
    pub(crate) unit: &'a UnitAccess,
}

impl EvalScope<'_> {
    fn net_for(&self, sig: SignalId) -> NetId {
        self.signal_net[sig.as_raw() as usize]
    }

    fn check_declared(&self, net: NetId, set: &[NetId]) -> Result<(), SimError> {
        if set.binary_search(&net).is_ok() {
            Ok(())
        } else {
            Err(SimError::UndeclaredAccess {
                unit: self.unit.name.clone(),
                signal: self.nets[net.as_raw() as usize].name.clone(),
            })
        }
    }

    /// Reads the current value of a signal's net.
    ///
    /// Pending (non-blocking) values are never observable here, not even by
    /// the unit that wrote them.
    pub fn read(&self, sig: SignalId) -> Result<Bits, SimError> {
        let net = self.net_for(sig);
        self.check_declared(net, &self.unit.reads)?;
        Ok(self.nets[net.as_raw() as usize].current.clone())
    }

    /// Immediate (blocking) write: the net's current value is replaced right
    /// away and is visible to every later unit in the same pass.
    ///
    /// Only combinational and method-call units may write this way. A
    /// narrower value zero-extends to the net width; a wider one fails.
    pub fn write(&mut self, sig: SignalId, value: Bits) -> Result<(), SimError> {
        if self.unit.kind == UnitKind::Sequential {
            return Err(SimError::BlockingInSequential {
                unit: self.unit.name.clone(),
            });
        }
        let net = self.net_for(sig);
        self.check_declared(net, &self.unit.writes)?;
        let state = &mut self.nets[net.as_raw() as usize];
        state.current = Bits::from_bits(state.width, &value)?;
        Ok(())
    }

    /// Non-blocking write: the value is stored as the net's pending value
    /// and becomes current only at the commit phase.
    ///
    /// Only sequential units may write this way.
    pub fn write_next(&mut self, sig: SignalId, value: Bits) -> Result<(), SimError> {
        if self.unit.kind != UnitKind::Sequential {
            return Err(SimError::NonBlockingInCombinational {
                unit: self.unit.name.clone(),
            });
        }
        let net = self.net_for(sig);
        self.check_declared(net, &self.unit.writes)?;
        let state = &mut self.nets[net.as_raw() as usize];
        state.pending = Some(Bits::from_bits(state.width, &value)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairos_common::ValueError;
    use kairos_ir::UnitId;

    fn scope_fixture(kind: UnitKind) -> (Vec<NetState>, Vec<NetId>, UnitAccess) {
        let nets = vec![
            NetState::new("top.a".into(), 8, false),
            NetState::new("top.b".into(), 8, false),
        ];
        // Two signals mapping onto the two nets.
        let signal_net = vec![NetId::from_raw(0), NetId::from_raw(1)];
        let unit = UnitAccess {
            id: UnitId::from_raw(0),
            name: "top.u".into(),
            kind,
            reads: vec![NetId::from_raw(0)],
            writes: vec![NetId::from_raw(1)],
        };
        (nets, signal_net, unit)
    }

    #[test]
    fn read_returns_current() {
        let (mut nets, signal_net, unit) = scope_fixture(UnitKind::Combinational);
        nets[0].current = Bits::from_int(8, 42).unwrap();
        let scope = EvalScope {
            nets: &mut nets,
            signal_net: &signal_net,
            unit: &unit,
        };
        assert_eq!(scope.read(SignalId::from_raw(0)).unwrap().to_u64(), Some(42));
    }

    #[test]
    fn read_outside_declared_set_fails() {
        let (mut nets, signal_net, unit) = scope_fixture(UnitKind::Combinational);
        let scope = EvalScope {
            nets: &mut nets,
            signal_net: &signal_net,
            unit: &unit,
        };
        assert!(matches!(
            scope.read(SignalId::from_raw(1)),
            Err(SimError::UndeclaredAccess { .. })
        ));
    }

    #[test]
    fn blocking_write_is_immediate() {
        let (mut nets, signal_net, unit) = scope_fixture(UnitKind::Combinational);
        let mut scope = EvalScope {
            nets: &mut nets,
            signal_net: &signal_net,
            unit: &unit,
        };
        scope
            .write(SignalId::from_raw(1), Bits::from_int(8, 7).unwrap())
            .unwrap();
        assert_eq!(nets[1].current.to_u64(), Some(7));
        assert!(nets[1].pending.is_none());
    }

    #[test]
    fn nonblocking_write_is_pending() {
        let (mut nets, signal_net, unit) = scope_fixture(UnitKind::Sequential);
        let mut scope = EvalScope {
            nets: &mut nets,
            signal_net: &signal_net,
            unit: &unit,
        };
        scope
            .write_next(SignalId::from_raw(1), Bits::from_int(8, 5).unwrap())
            .unwrap();
        assert!(nets[1].current.is_zero());
        assert_eq!(nets[1].pending.as_ref().unwrap().to_u64(), Some(5));
    }

    #[test]
    fn sequential_blocking_write_rejected() {
        let (mut nets, signal_net, unit) = scope_fixture(UnitKind::Sequential);
        let mut scope = EvalScope {
            nets: &mut nets,
            signal_net: &signal_net,
            unit: &unit,
        };
        assert!(matches!(
            scope.write(SignalId::from_raw(1), Bits::new(8)),
            Err(SimError::BlockingInSequential { .. })
        ));
    }

    #[test]
    fn combinational_nonblocking_write_rejected() {
        let (mut nets, signal_net, unit) = scope_fixture(UnitKind::MethodCall);
        let mut scope = EvalScope {
            nets: &mut nets,
            signal_net: &signal_net,
            unit: &unit,
        };
        assert!(matches!(
            scope.write_next(SignalId::from_raw(1), Bits::new(8)),
            Err(SimError::NonBlockingInCombinational { .. })
        ));
    }

    #[test]
    fn narrow_write_zero_extends() {
        let (mut nets, signal_net, unit) = scope_fixture(UnitKind::Combinational);
        let mut scope = EvalScope {
            nets: &mut nets,
            signal_net: &signal_net,
            unit: &unit,
        };
        scope
            .write(SignalId::from_raw(1), Bits::from_int(4, 0b1010).unwrap())
            .unwrap();
        assert_eq!(nets[1].current.width(), 8);
        assert_eq!(nets[1].current.to_u64(), Some(0b1010));
    }

    #[test]
    fn wide_write_rejected() {
        let (mut nets, signal_net, unit) = scope_fixture(UnitKind::Combinational);
        let mut scope = EvalScope {
            nets: &mut nets,
            signal_net: &signal_net,
            unit: &unit,
        };
        let wide = Bits::from_int(16, 300).unwrap();
        assert!(matches!(
            scope.write(SignalId::from_raw(1), wide),
            Err(SimError::Value(ValueError::Width { src: 16, dst: 8 }))
        ));
    }
}
