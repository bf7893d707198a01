//! Opaque id new-types for circuit entities.
//!
//! Each id is a thin `u32` wrapper created by arena allocation. Nets receive
//! their ids during elaboration; everything else is allocated at registration
//! time.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an id from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque id for a component in the hierarchy.
    ComponentId
);

define_id!(
    /// Opaque id for a signal (port or wire) within a component.
    SignalId
);

define_id!(
    /// Opaque id for an interface bundle on a component.
    IfaceId
);

define_id!(
    /// Opaque id for a schedulable unit (update action or method binding).
    UnitId
);

define_id!(
    /// Opaque id for a net (electrical equivalence class of signals).
    NetId
);
