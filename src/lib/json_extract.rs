use serde_json::*;

/*
* Stored delivery days are expected as a JSON array of integers, but older rows hold
* numeric strings or comma-separated strings such as "1, 3" or ["1,3", 5].
* Values are returned unvalidated; range checks belong to the scheduler.
*/
pub fn extract_i64_list_from_value(value: &Value) -> std::result::Result<Vec<i64>, String> {
  let mut items: Vec<i64> = vec![];
  match value {
    Value::Array(entries) => {
      for entry in entries {
        items.extend(extract_i64_list_from_value(entry)?);
      }
    },
    Value::Number(num_ref) => match num_ref.as_i64() {
      Some(num) => items.push(num),
      None => return Err(format!("{} is not an integer", num_ref)),
    },
    Value::String(num_str) => {
      for part in num_str.split(",").map(|p| p.trim()).filter(|p| p.len() > 0) {
        match part.parse::<i64>() {
          Ok(num) => items.push(num),
          Err(_) => return Err(format!("{} is not an integer", part)),
        }
      }
    },
    Value::Null => (),
    _ => return Err(format!("unexpected value {}", value)),
  }
  Ok(items)
}

pub fn parse_i64_list(source: &str) -> std::result::Result<Vec<i64>, String> {
  let trimmed = source.trim();
  if trimmed.len() < 1 {
    return Ok(vec![]);
  }
  match serde_json::from_str::<Value>(trimmed) {
    Ok(value) => extract_i64_list_from_value(&value),
    // bare "1,3,5" without JSON quoting
    Err(_) => extract_i64_list_from_value(&Value::String(trimmed.to_string())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plain_array() {
    assert_eq!(parse_i64_list("[1, 3, 5]"), Ok(vec![1, 3, 5]));
  }

  #[test]
  fn test_legacy_encodings() {
    assert_eq!(parse_i64_list(r#"["1", "3"]"#), Ok(vec![1, 3]));
    assert_eq!(parse_i64_list(r#"["1, 3", 5]"#), Ok(vec![1, 3, 5]));
    assert_eq!(parse_i64_list("2,4"), Ok(vec![2, 4]));
    assert_eq!(parse_i64_list(r#""0""#), Ok(vec![0]));
    assert_eq!(parse_i64_list(""), Ok(vec![]));
    assert_eq!(parse_i64_list("null"), Ok(vec![]));
  }

  #[test]
  fn test_out_of_range_passes_through() {
    assert_eq!(parse_i64_list("[8]"), Ok(vec![8]));
  }

  #[test]
  fn test_rejects_non_numeric() {
    assert!(parse_i64_list(r#"["Pazartesi"]"#).is_err());
    assert!(parse_i64_list("[1.5]").is_err());
    assert!(parse_i64_list(r#"{"day": 1}"#).is_err());
  }
}
