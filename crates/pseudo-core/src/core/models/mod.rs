//! Data model for pseudopotential records.
//!
//! - [`pseudo`] - The record itself, its type tag and its lifecycle state
//! - [`ids`] - Storage keys handed out by the engine's store

pub mod ids;
pub mod pseudo;
