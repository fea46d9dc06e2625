//! Core types and trait definitions for the Officine follow-up store.
//!
//! This crate is deliberately free of HTTP and filesystem dependencies.
//! All other crates depend on it.

pub mod blank;
pub mod doctor;
pub mod error;
pub mod id;
pub mod patient;
pub mod store;
pub mod visit;

pub use error::{Error, ErrorKind, Result, StoreError};
