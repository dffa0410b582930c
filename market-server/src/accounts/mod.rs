//! User profiles and seller counters

pub mod storage;

pub use storage::AccountStorage;
