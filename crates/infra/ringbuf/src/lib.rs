//! Fixed-capacity ring buffer for fixed-size binary records
//!
//! Built for targets without a heap:
//! - Backing memory is borrowed from the caller, never allocated or freed
//! - Capacity is a compile-time constant (`big-mem` feature selects 1024)
//! - Every buffer holds a slot in an instance registry so diagnostic dumps
//!   can say which instance produced them
//!
//! # Example
//!
//! ```
//! use ringbuf::RingBuffer;
//!
//! let mut memory = [0u8; 4 * 4];
//! let mut ring = RingBuffer::<4>::bind(&mut memory, 4, 1)?;
//!
//! ring.insert(&[0xAA; 4])?;
//! ring.insert(&[0xBB; 4])?;
//!
//! let mut out = [0u8; 4];
//! ring.remove_oldest(&mut out)?;
//! assert_eq!(out, [0xAA; 4]);
//! assert_eq!(ring.count(), 1);
//! # Ok::<(), ringbuf::RingError>(())
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dump;
pub mod error;
pub mod registry;
pub mod ring;

pub use config::{DEFAULT_CAPACITY, RING_MODULE_NAME, RingConfig, SizeRule};
pub use dump::RingDump;
pub use error::{RegistryError, RegistryResult, RingError, RingResult};
pub use registry::{InstanceRegistry, MAX_MODULES, Slot};
pub use ring::{Records, RingBuffer};
