use chrono::NaiveDate;
use serde::Deserialize;
use super::error::AppError;
use super::lib::{date_conv::*, json_extract::*};

#[derive(Deserialize, Debug, Default)]
pub struct InputOptions {
  pub dt: Option<String>, // reference date, YYYY-mm-dd, defaults to the local date
  pub days: Option<String>, // comma-separated weekday indices, 0 = Sunday
  pub cat: Option<String>, // category slug
  #[serde(rename = "regionId")]
  pub region_id: Option<u64>, // region id for neighborhood listings
}

fn is_valid_date_string(dt_str: &str) -> bool {
  dt_str.contains("-") && dt_str.chars().filter(|c| c.is_numeric()).count() >= 6
}

/*
* Preview date for the scheduler endpoints; unusable values fall back to today
*/
pub fn match_today_from_params(params: &InputOptions) -> NaiveDate {
  let dt_str: String = params.dt.clone().unwrap_or("".to_string());
  if is_valid_date_string(&dt_str) {
    if let Some(date) = iso_string_to_date(&dt_str) {
      return date;
    }
  }
  current_date()
}

pub fn match_days_from_params(params: &InputOptions) -> Result<Vec<i64>, AppError> {
  let days_str: String = params.days.clone().unwrap_or("".to_string());
  parse_i64_list(&days_str).map_err(|reason| AppError::BadRequest(format!("Invalid days: {}", reason)))
}

pub fn match_category_from_params(params: &InputOptions) -> Option<String> {
  params.cat.clone().map(|c| c.trim().to_lowercase()).filter(|c| c.len() > 0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_today_override() {
    let params = InputOptions { dt: Some("2024-10-23".to_string()), ..Default::default() };
    assert_eq!(match_today_from_params(&params), NaiveDate::from_ymd_opt(2024, 10, 23).unwrap());
    let params = InputOptions { dt: Some("yesterday".to_string()), ..Default::default() };
    assert_eq!(match_today_from_params(&params), current_date());
  }

  #[test]
  fn test_days() {
    let params = InputOptions { days: Some("1,3, 5".to_string()), ..Default::default() };
    assert_eq!(match_days_from_params(&params).unwrap(), vec![1, 3, 5]);
    assert!(match_days_from_params(&InputOptions::default()).unwrap().is_empty());
    let params = InputOptions { days: Some("mon".to_string()), ..Default::default() };
    assert!(matches!(match_days_from_params(&params), Err(AppError::BadRequest(_))));
  }

  #[test]
  fn test_category() {
    let params = InputOptions { cat: Some(" Peynir ".to_string()), ..Default::default() };
    assert_eq!(match_category_from_params(&params).as_deref(), Some("peynir"));
    assert_eq!(match_category_from_params(&InputOptions::default()), None);
  }
}
