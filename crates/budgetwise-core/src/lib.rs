//! budgetwise-core
//!
//! Financial computations and the authoritative budget store.
//! Depends on budgetwise-domain. No terminal I/O, no direct filesystem access;
//! persistence goes through the [`storage::KeyValueStore`] adapter.

pub mod error;
pub mod insights;
pub mod loan;
pub mod projection;
pub mod selection;
pub mod storage;
pub mod store;
pub mod time;

pub use error::CoreError;
pub use insights::*;
pub use loan::*;
pub use projection::*;
pub use selection::*;
pub use storage::{KeyValueStore, MemoryStore, COLLECTION_KEY};
pub use store::*;
pub use time::{Clock, FixedClock, SystemClock};
