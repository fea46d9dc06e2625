//! Identifier generation.
//!
//! Ids have the shape `<prefix>-<unix millis>-<8 hex digits>`. The timestamp
//! keeps ids roughly sortable by creation time; the random suffix keeps two
//! ids minted in the same millisecond apart. Callers that need a hard
//! guarantee pass the set of ids already in use to [`generate_unique`].

use chrono::Utc;
use uuid::Uuid;

pub const DOCTOR_PREFIX: &str = "D";
pub const PATIENT_PREFIX: &str = "P";
pub const VISIT_PREFIX: &str = "V";

/// Mint a fresh id with the given prefix.
pub fn generate(prefix: &str) -> String {
  let millis = Utc::now().timestamp_millis();
  // The low 32 bits of a v4 UUID are fully random.
  let suffix = Uuid::new_v4().as_u128() as u32;
  format!("{prefix}-{millis}-{suffix:08x}")
}

/// Mint ids until one is not rejected by `is_taken`.
pub fn generate_unique(prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
  loop {
    let id = generate(prefix);
    if !is_taken(&id) {
      return id;
    }
  }
}
