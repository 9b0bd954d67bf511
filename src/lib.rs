// src/lib.rs
#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod error;
pub mod config;
pub mod core;
pub mod csv;
pub mod file;
pub mod progress;
pub mod store;

pub mod names;
pub mod roster;
pub mod specs;
pub mod scrape;
pub mod corpus;

#[cfg(feature = "cli")]
pub mod cli;
pub mod gui;

pub use error::{Error, Result};
