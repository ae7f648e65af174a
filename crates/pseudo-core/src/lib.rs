//! # pseudofam
//!
//! Pseudopotential records and element-keyed families for electronic-structure
//! workflows.
//!
//! The library is split into three layers:
//!
//! - **[`core`]: The Foundation.** Stateless data: the periodic table lookup,
//!   the [`PseudoPotential`](core::models::pseudo::PseudoPotential) record and
//!   the readers for the UPF and VPS file formats.
//!
//! - **[`engine`]: The Logic Core.** The stateful part: a [`Store`](engine::store::Store)
//!   that freezes records once stored and keeps family labels unique, and
//!   [`PseudoFamily`](engine::family::PseudoFamily), which enforces one record
//!   per element and a single exact record type per family.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as importing a
//!   folder of pseudopotentials as a new family.

pub mod core;
pub mod engine;
pub mod workflows;
