//! Executable unit bodies, registered separately from the IR.
//!
//! The circuit description stays pure data; the opaque callables that give
//! each schedulable unit its behavior are collected here and handed to the
//! engine at construction. A method-call unit carries two bodies: the
//! ready/guard query and the call itself.

use std::collections::HashMap;

use kairos_ir::UnitId;

use crate::error::SimError;
use crate::scope::EvalScope;

/// The opaque callable body of a schedulable unit.
///
/// Bodies run to completion synchronously; they never suspend or yield.
pub type UnitBody = Box<dyn FnMut(&mut EvalScope<'_>) -> Result<(), SimError>>;

/// The shape of a registered body, used for construction-time validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// A single update body.
    Update,
    /// A guard/call pair for a method-call unit.
    Method,
}

pub(crate) enum BodyEntry {
    Update(UnitBody),
    Method {
        guard: Option<UnitBody>,
        call: UnitBody,
    },
}

/// The body table handed to [`SimEngine::new`](crate::SimEngine::new).
#[derive(Default)]
pub struct UnitBodies {
    entries: HashMap<UnitId, BodyEntry>,
}

impl std::fmt::Debug for UnitBodies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitBodies")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl UnitBodies {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the update body of a combinational or sequential unit.
    pub fn set(&mut self, unit: UnitId, body: UnitBody) {
        self.entries.insert(unit, BodyEntry::Update(body));
    }

    /// Registers the guard and call bodies of a method-call unit.
    pub fn set_method(&mut self, unit: UnitId, guard: Option<UnitBody>, call: UnitBody) {
        self.entries.insert(unit, BodyEntry::Method { guard, call });
    }

    /// Returns the shape of a registered body, if any.
    pub fn shape_of(&self, unit: UnitId) -> Option<BodyShape> {
        self.entries.get(&unit).map(|e| match e {
            BodyEntry::Update(_) => BodyShape::Update,
            BodyEntry::Method { .. } => BodyShape::Method,
        })
    }

    pub(crate) fn entry_mut(&mut self, unit: UnitId) -> Option<&mut BodyEntry> {
        self.entries.get_mut(&unit)
    }
}
