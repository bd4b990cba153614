//! Core data types shared by the parser, generator, and synchronizer.

pub mod errors;
pub mod model;
