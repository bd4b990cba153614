//! Infrastructure adapters for configuration, clipboard, logging, and navigation.

pub mod clipboard;
pub mod config;
pub mod location;
pub mod logging;
