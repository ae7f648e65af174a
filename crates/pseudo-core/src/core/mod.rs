//! # Core Module
//!
//! Stateless building blocks shared by the rest of the library.
//!
//! - **Element Table** ([`utils`]) - Periodic table symbols and filename parsing
//! - **Records** ([`models`]) - The pseudopotential record and its type tag
//! - **File Formats** ([`io`]) - Header readers for UPF and VPS files

pub mod io;
pub mod models;
pub mod utils;
