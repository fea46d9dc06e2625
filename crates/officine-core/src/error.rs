//! Error types for `officine-core`.

use thiserror::Error;

/// Domain failures shared by every store backend.
#[derive(Debug, Error)]
pub enum Error {
  #[error("patient not found: {0}")]
  PatientNotFound(String),

  #[error("visit {visit_id} not found for patient {patient_id}")]
  VisitNotFound {
    patient_id: String,
    visit_id:   String,
  },

  #[error("email already registered: {0}")]
  DuplicateEmail(String),

  #[error("invalid input: {0}")]
  Validation(String),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::PatientNotFound(_) | Self::VisitNotFound { .. } => ErrorKind::NotFound,
      Self::DuplicateEmail(_) => ErrorKind::DuplicateEmail,
      Self::Validation(_) => ErrorKind::Validation,
    }
  }
}

/// Coarse classification used by the HTTP boundary to pick a status code.
///
/// `Storage` is the only server-side class; the other three are caused by
/// client input and are reported back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  DuplicateEmail,
  Validation,
  Storage,
}

/// Implemented by backend error types so callers can classify failures
/// without knowing the concrete backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind { Error::kind(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
