//! Provides readers for pseudopotential file formats.
//!
//! Each format implements [`traits::PseudoFormat`], which turns the text of a
//! file into the header values a record needs. The element itself is never
//! read from content; it always comes from the filename.

pub mod error;
pub(crate) mod patterns;
pub mod traits;
pub mod upf;
pub mod vps;
