//! Application layer: parsing, table generation, synchronization, and rendering.

pub mod export;
pub mod options;
pub mod session;
pub mod state;
pub mod sync;
pub mod table;
