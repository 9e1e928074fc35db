//! Local artifact storage for generation runs.
//!
//! This crate provides:
//! - Per-run dated output folders
//! - Image/audio persistence
//! - Streaming download of the synthesized video asset
//! - Metadata record save/load/list

pub mod error;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use store::OutputStore;
