//! # Engine Module
//!
//! The stateful layer: it stores records, keeps families consistent and
//! guarantees that failed operations leave no partial state behind.
//!
//! - **Storage** ([`store`]) - Node and group storage with unique family labels
//! - **Families** ([`family`]) - Element-keyed collections of stored records
//! - **Configuration** ([`config`]) - Family settings and their validation
//! - **Progress Monitoring** ([`progress`]) - Callbacks for long-running workflows
//! - **Error Handling** ([`error`]) - Errors raised by family operations
//!
//! Rollback is provided by [`store::Store::transaction`].

pub mod config;
pub mod error;
pub mod family;
pub mod progress;
pub mod store;
mod transaction;
