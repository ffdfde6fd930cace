//! `treasurehunt` - flat-file record keeping for treasure hunts
//!
//! This library manages per-hunt collections of fixed-width binary
//! treasure records, an append-only audit log per hunt, and a
//! discoverable symbolic link to the most recently mutated hunt's log.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod hunt;
pub mod logging;
pub mod record;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use hunt::Hunt;
pub use logging::init_logging;
pub use record::{Treasure, RECORD_SIZE};
pub use store::Store;
