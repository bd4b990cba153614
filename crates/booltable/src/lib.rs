pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ui;

pub use app::options::parse;
pub use app::table::{generate, map_rows};
