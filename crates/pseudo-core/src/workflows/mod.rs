//! # Workflows Module
//!
//! End-to-end procedures built on the engine.
//!
//! - **Folder import** ([`create_from_folder`]) - Parses a directory of
//!   pseudopotential files and stores them as a new family in one transaction.

pub mod create_from_folder;
