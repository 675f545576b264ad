//! Block store implementations.
//!
//! Both stores keep every stored copy of a block, so a height can be present several times. They
//! implement the read, prune and write collaborator traits of
//! [`gapsync_interfaces::provider`].
//!
//! - [`InMemoryBlockStore`] keeps the copies in memory.
//! - [`FileBlockStore`] loads a JSON snapshot into memory and writes it back on
//!   [`FileBlockStore::flush`].

#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod file;
mod memory;

pub use file::{FileBlockStore, StoreFile};
pub use memory::InMemoryBlockStore;
