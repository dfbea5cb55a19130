pub mod addresses;
pub mod catalog;
pub mod orders;
pub mod regions;
pub mod users;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::AppError;

// DECIMAL columns arrive as text
pub fn parse_price(raw: &str) -> Result<Decimal, AppError> {
  Decimal::from_str(raw.trim())
    .map_err(|e| AppError::InvalidStoredValue(format!("price {}: {}", raw, e)))
}

pub fn require_text(value: &Option<String>, field: &'static str) -> Result<String, AppError> {
  match value {
    Some(text) if text.trim().len() > 0 => Ok(text.trim().to_string()),
    _ => Err(AppError::MissingField(field)),
  }
}

pub fn new_id() -> String {
  uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_price() {
    assert_eq!(parse_price("12.50").unwrap(), Decimal::new(1250, 2));
    assert!(matches!(parse_price("twelve"), Err(AppError::InvalidStoredValue(_))));
  }

  #[test]
  fn test_require_text() {
    assert_eq!(require_text(&Some(" Moda ".to_string()), "name").unwrap(), "Moda");
    assert!(matches!(require_text(&Some("  ".to_string()), "name"), Err(AppError::MissingField("name"))));
    assert!(matches!(require_text(&None, "title"), Err(AppError::MissingField("title"))));
  }

  #[test]
  fn test_new_id_is_uuid() {
    let id = new_id();
    assert_eq!(id.len(), 36);
    assert!(uuid::Uuid::parse_str(&id).is_ok());
  }
}
