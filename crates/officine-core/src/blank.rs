//! Serde support for optional fields submitted by HTML forms.
//!
//! Untouched form inputs arrive as `""`. Every optional scalar or enum in the
//! data model goes through [`option`], so a missing key, `null`, and a blank
//! string all deserialize to `None`.

use serde::{
  Deserialize, Deserializer,
  de::{IntoDeserializer, value::StringDeserializer},
};

/// Use as `#[serde(default, deserialize_with = "crate::blank::option")]`.
pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  match raw {
    Some(s) if !s.trim().is_empty() => {
      let inner: StringDeserializer<D::Error> = s.into_deserializer();
      T::deserialize(inner).map(Some)
    }
    _ => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use serde::Deserialize;

  #[derive(Debug, Deserialize)]
  struct Probe {
    #[serde(default, deserialize_with = "super::option")]
    text: Option<String>,
    #[serde(default, deserialize_with = "super::option")]
    date: Option<NaiveDate>,
  }

  #[test]
  fn blank_missing_and_null_are_absent() {
    let p: Probe = serde_json::from_str(r#"{"text":"  ","date":null}"#).unwrap();
    assert!(p.text.is_none());
    assert!(p.date.is_none());

    let p: Probe = serde_json::from_str("{}").unwrap();
    assert!(p.text.is_none());
    assert!(p.date.is_none());
  }

  #[test]
  fn present_values_are_parsed_through_the_inner_type() {
    let p: Probe =
      serde_json::from_str(r#"{"text":"ok","date":"1980-01-01"}"#).unwrap();
    assert_eq!(p.text.as_deref(), Some("ok"));
    assert_eq!(p.date, NaiveDate::from_ymd_opt(1980, 1, 1));
  }

  #[test]
  fn malformed_values_are_rejected() {
    let err = serde_json::from_str::<Probe>(r#"{"date":"yesterday"}"#);
    assert!(err.is_err());
  }
}
