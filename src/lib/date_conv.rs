use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use crate::app::weekday_code::WeekdayIndex;

pub const MONTH_NAMES_TR: [&'static str; 12] = [
  "Ocak",
  "Şubat",
  "Mart",
  "Nisan",
  "Mayıs",
  "Haziran",
  "Temmuz",
  "Ağustos",
  "Eylül",
  "Ekim",
  "Kasım",
  "Aralık",
];

/**
 * Utility function to convert any ISO-8601-like date string to a Chrono NaiveDate object
 * This function accepts YYYY-mm-dd with an optional time part separated by a space or letter T.
 * Missing month or day parts are replaced by 01, hence 2024-10 will be 2024-10-01.
 * Legacy delivery labels such as "Monday - 2024-10-21" resolve to the date after the last " - ".
 */
pub fn iso_string_to_date(dt: &str) -> Option<NaiveDate> {
  let dt_base = dt.rsplit(" - ").next().unwrap_or(dt).trim();
  let date_part = dt_base.split(|c| c == 'T' || c == ' ').next().unwrap_or("");
  let mut date_parts: Vec<&str> = date_part.split("-").filter(|p| p.len() > 0).collect();
  if date_parts.len() < 1 || date_parts.len() > 3 {
    return None;
  }
  while date_parts.len() < 3 {
    date_parts.push("01");
  }
  let year = date_parts[0].parse::<i32>().ok()?;
  let month = date_parts[1].parse::<u32>().ok()?;
  let day = date_parts[2].parse::<u32>().ok()?;
  NaiveDate::from_ymd_opt(year, month, day)
}

pub fn current_date() -> NaiveDate {
  Local::now().date_naive()
}

pub fn current_timestamp() -> i64 {
  chrono::offset::Utc::now().timestamp()
}

pub fn unixtime_to_local_datetime(ts: i64) -> NaiveDateTime {
  match DateTime::from_timestamp(ts, 0) {
    Some(dt) => dt.with_timezone(&Local).naive_local(),
    None => NaiveDateTime::default(),
  }
}

/*
  23 Ekim 2024
*/
pub fn format_long_date_tr(date: &NaiveDate) -> String {
  format!("{} {} {}", date.day(), MONTH_NAMES_TR[date.month0() as usize], date.year())
}

/*
  Çarşamba - 23 Ekim 2024
*/
pub fn delivery_day_label(date: &NaiveDate) -> String {
  format!("{} - {}", WeekdayIndex::of(date).name_tr(), format_long_date_tr(date))
}

/*
  23 Ekim 2024, 14:05
*/
pub fn format_datetime_tr(dt: &NaiveDateTime) -> String {
  format!("{}, {}", format_long_date_tr(&dt.date()), dt.format("%H:%M"))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_iso_string_to_date() {
    assert_eq!(iso_string_to_date("2024-10-23"), Some(ymd(2024, 10, 23)));
    assert_eq!(iso_string_to_date("2024-10-23T18:20:00"), Some(ymd(2024, 10, 23)));
    assert_eq!(iso_string_to_date("2024-10-23 18:20"), Some(ymd(2024, 10, 23)));
    assert_eq!(iso_string_to_date("2024-10"), Some(ymd(2024, 10, 1)));
    assert_eq!(iso_string_to_date("Monday - 2024-10-21"), Some(ymd(2024, 10, 21)));
  }

  #[test]
  fn test_iso_string_rejects_garbage() {
    assert_eq!(iso_string_to_date(""), None);
    assert_eq!(iso_string_to_date("2024-13-01"), None);
    assert_eq!(iso_string_to_date("tomorrow"), None);
    assert_eq!(iso_string_to_date("2024-02-30"), None);
  }

  #[test]
  fn test_turkish_formats() {
    assert_eq!(format_long_date_tr(&ymd(2024, 2, 5)), "5 Şubat 2024");
    assert_eq!(delivery_day_label(&ymd(2024, 10, 23)), "Çarşamba - 23 Ekim 2024");
    let dt = ymd(2024, 12, 31).and_hms_opt(9, 5, 0).unwrap();
    assert_eq!(format_datetime_tr(&dt), "31 Aralık 2024, 09:05");
  }
}
