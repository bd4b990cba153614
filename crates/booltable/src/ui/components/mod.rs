//! Collection of reusable TUI components.

pub mod options_input;
pub mod summary;
pub mod table_view;
