//! Arithmetic primitives shared by the fixed-capacity buffer crates
//!
//! Everything here is allocation-free and panic-free:
//! - Saturating counters with optional bounds
//! - Byte swapping, byte extraction and packed-BCD conversion
//! - Spin-wait hint for busy loops

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod bits;
pub mod relax;
pub mod saturating;

pub use relax::cpu_relax;
pub use saturating::{Saturating, decr, incr};
