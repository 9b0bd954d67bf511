// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Submodules stay private; consumers only see actions::{copy,export,scrape}.

mod copy;
mod export;
mod scrape;

pub use copy::copy;
pub use export::export;
pub use scrape::{poll_scrape, scrape};
