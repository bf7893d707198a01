//! Shared foundational types for the Kairos cycle-based circuit simulator.
//!
//! This crate provides the fixed-width two's-complement [`Bits`] value type,
//! the precomputed per-width range bounds backing it, the runtime value-error
//! taxonomy, and interned identifiers used throughout the workspace.

#![warn(missing_docs)]

pub mod bits;
pub mod bounds;
pub mod error;
pub mod ident;

pub use bits::Bits;
pub use error::ValueError;
pub use ident::{Ident, Interner};
