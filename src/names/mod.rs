// src/names/mod.rs
pub mod matcher;
pub mod standardize;

pub use matcher::{AuthorBook, NameMatch};
pub use standardize::{format_name, standardize, std_key};
