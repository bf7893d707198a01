//! Simulation error types.
//!
//! Runtime value errors abort the current `tick` immediately; they are not
//! retried or silently recovered, because a bad value indicates a design or
//! testbench bug, not a transient condition. Engine state is unspecified
//! after a failed tick.

use kairos_common::ValueError;

/// Errors produced during engine construction or cycle execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// A bit-vector operation inside a unit body failed.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A scheduled unit has no body registered.
    #[error("unit {unit} has no body registered")]
    MissingBody {
        /// Path of the bodiless unit.
        unit: String,
    },

    /// A unit's registered body does not match its kind (update body for a
    /// method-call unit, or vice versa).
    #[error("unit {unit} has a body of the wrong kind")]
    WrongBodyKind {
        /// Path of the offending unit.
        unit: String,
    },

    /// A body touched a net outside its declared read/write sets.
    #[error("unit {unit} accessed undeclared signal {signal}")]
    UndeclaredAccess {
        /// Path of the offending unit.
        unit: String,
        /// Path of the touched net (named after its first member).
        signal: String,
    },

    /// A sequential unit attempted an immediate (blocking) write.
    #[error("sequential unit {unit} attempted an immediate (blocking) write")]
    BlockingInSequential {
        /// Path of the offending unit.
        unit: String,
    },

    /// A combinational or method-call unit attempted a non-blocking write.
    #[error("combinational unit {unit} attempted a non-blocking write")]
    NonBlockingInCombinational {
        /// Path of the offending unit.
        unit: String,
    },

    /// `poke` targeted a net that is not a top-level port.
    #[error("net {net} is not a poke target (no top-level port member)")]
    PokeForbidden {
        /// Path of the net.
        net: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_is_transparent() {
        let e = SimError::from(ValueError::DivisionByZero);
        assert_eq!(e.to_string(), "division by zero");
    }

    #[test]
    fn missing_body_display() {
        let e = SimError::MissingBody {
            unit: "top.alu.compute".into(),
        };
        assert_eq!(e.to_string(), "unit top.alu.compute has no body registered");
    }

    #[test]
    fn undeclared_access_display() {
        let e = SimError::UndeclaredAccess {
            unit: "top.a".into(),
            signal: "top.x".into(),
        };
        assert_eq!(e.to_string(), "unit top.a accessed undeclared signal top.x");
    }

    #[test]
    fn discipline_displays() {
        let e = SimError::BlockingInSequential {
            unit: "top.ff".into(),
        };
        assert_eq!(
            e.to_string(),
            "sequential unit top.ff attempted an immediate (blocking) write"
        );
        let e = SimError::NonBlockingInCombinational {
            unit: "top.comb".into(),
        };
        assert_eq!(
            e.to_string(),
            "combinational unit top.comb attempted a non-blocking write"
        );
    }

    #[test]
    fn poke_forbidden_display() {
        let e = SimError::PokeForbidden {
            net: "top.child.w".into(),
        };
        assert_eq!(
            e.to_string(),
            "net top.child.w is not a poke target (no top-level port member)"
        );
    }
}
