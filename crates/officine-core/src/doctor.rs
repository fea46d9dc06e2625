//! Doctor accounts.
//!
//! A doctor record is created once at signup and never updated. The stored
//! record carries the password hash; stripping it before anything leaves the
//! process is the HTTP boundary's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  Doctor,
  Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
  pub id:            String,
  /// Unique across all doctors, compared byte-for-byte.
  pub email:         String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub full_name:     String,
  pub role:          Role,
  /// Inactive doctors keep their record but cannot log in.
  pub active:        bool,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::FollowUpStore::create_doctor`].
/// `id`, `active` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewDoctor {
  pub email:         String,
  pub password_hash: String,
  pub full_name:     String,
  pub role:          Role,
}

impl NewDoctor {
  pub fn validate(&self) -> Result<()> {
    if self.email.trim().is_empty() || !self.email.contains('@') {
      return Err(Error::Validation(format!(
        "invalid email address: {:?}",
        self.email
      )));
    }
    if self.password_hash.is_empty() {
      return Err(Error::Validation("password hash is required".into()));
    }
    if self.full_name.trim().is_empty() {
      return Err(Error::Validation("full name is required".into()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_doctor(email: &str, name: &str) -> NewDoctor {
    NewDoctor {
      email:         email.into(),
      password_hash: "$argon2id$stub".into(),
      full_name:     name.into(),
      role:          Role::Doctor,
    }
  }

  #[test]
  fn well_formed_input_passes() {
    assert!(new_doctor("amina@officine.ma", "Amina Idrissi").validate().is_ok());
  }

  #[test]
  fn email_without_at_sign_is_rejected() {
    let err = new_doctor("amina", "Amina Idrissi").validate().unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn blank_name_is_rejected() {
    let err = new_doctor("amina@officine.ma", "   ").validate().unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn stored_shape_uses_camel_case_keys() {
    let doctor = Doctor {
      id:            "D-1-00000000".into(),
      email:         "amina@officine.ma".into(),
      password_hash: "hash".into(),
      full_name:     "Amina Idrissi".into(),
      role:          Role::Doctor,
      active:        true,
      created_at:    Utc::now(),
    };
    let json = serde_json::to_value(&doctor).unwrap();
    assert_eq!(json["passwordHash"], "hash");
    assert_eq!(json["fullName"], "Amina Idrissi");
    assert_eq!(json["role"], "doctor");
    assert!(json.get("createdAt").is_some());
  }
}
