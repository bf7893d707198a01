//! Circuit description IR for the Kairos cycle-based simulator.
//!
//! A circuit is a hierarchy of components carrying signals, interface
//! bundles, and schedulable units, plus declared connections and explicit
//! ordering constraints. Everything is registered explicitly and stored in
//! flat arenas; elaboration (net resolution, constraint collection,
//! scheduling) lives in `kairos_elaborate`.

#![warn(missing_docs)]

pub mod arena;
pub mod circuit;
pub mod component;
pub mod connect;
pub mod iface;
pub mod ids;
pub mod signal;
pub mod unit;

pub use arena::{Arena, ArenaId};
pub use circuit::Circuit;
pub use component::Component;
pub use connect::{Connection, ConstraintKind, OrderConstraint};
pub use iface::{Interface, IfaceRole};
pub use ids::{ComponentId, IfaceId, NetId, SignalId, UnitId};
pub use signal::{Signal, SignalKind};
pub use unit::{SchedUnit, UnitKind};
