//! Interactive console front end for the inventory tracker.
//!
//! The menu only gathers fields, parses them into typed requests and calls the
//! catalog, supplier directory and order placement operations. It holds no
//! business rules of its own.

pub mod config;
pub mod menu;
pub mod prompt;
pub mod render;

pub use config::{CliConfig, OutputFormat};
pub use menu::{Inventory, Menu, MenuChoice};
pub use prompt::Prompter;
