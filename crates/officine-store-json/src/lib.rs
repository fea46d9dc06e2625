//! Flat-file JSON backend for the Officine follow-up store.
//!
//! Each concern lives in one JSON document under a data directory:
//! `doctors.json`, `patients_index.json` and `patients_data.json`. Documents
//! are replaced atomically (write to a temp file, then rename), and writers
//! to the same document are serialised in-process. Nothing protects against
//! a second process writing the same directory.

mod file;
mod index;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use file::FileStore;
pub use store::JsonStore;
