use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Serialize, Deserialize};
use thiserror::Error;

pub const WEEKDAY_NAMES_TR: [&'static str; 7] = [
  "Pazar",
  "Pazartesi",
  "Salı",
  "Çarşamba",
  "Perşembe",
  "Cuma",
  "Cumartesi",
];

pub const WEEKDAY_ABBRS: [&'static str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid weekday index {0}, expected 0 (Sunday) to 6 (Saturday)")]
pub struct InvalidWeekdayError(pub i64);

/// Day of the week counted from Sunday = 0 to Saturday = 6.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "u8")]
pub struct WeekdayIndex(u8);

impl WeekdayIndex {
  pub fn new(value: i64) -> Result<Self, InvalidWeekdayError> {
    if (0..7).contains(&value) {
      Ok(WeekdayIndex(value as u8))
    } else {
      Err(InvalidWeekdayError(value))
    }
  }

  pub fn of(date: &NaiveDate) -> Self {
    WeekdayIndex::from(date.weekday())
  }

  pub fn value(&self) -> u8 {
    self.0
  }

  pub fn name_tr(&self) -> &'static str {
    WEEKDAY_NAMES_TR[self.0 as usize]
  }

  /*
  * Days from `from` to the next occurrence of this weekday, 0 when they coincide
  */
  pub fn days_after(&self, from: WeekdayIndex) -> i64 {
    (self.0 as i64 - from.0 as i64 + 7) % 7
  }
}

impl From<Weekday> for WeekdayIndex {
  fn from(day: Weekday) -> Self {
    WeekdayIndex(day.num_days_from_sunday() as u8)
  }
}

impl TryFrom<i64> for WeekdayIndex {
  type Error = InvalidWeekdayError;

  fn try_from(value: i64) -> Result<Self, Self::Error> {
    WeekdayIndex::new(value)
  }
}

impl From<WeekdayIndex> for u8 {
  fn from(day: WeekdayIndex) -> u8 {
    day.0
  }
}

/// Validates raw indices, dropping repeats and keeping Sunday-first order.
pub fn to_weekday_set(values: &[i64]) -> Result<Vec<WeekdayIndex>, InvalidWeekdayError> {
  let mut days = values.iter().map(|v| WeekdayIndex::new(*v)).collect::<Result<Vec<_>, _>>()?;
  days.sort();
  days.dedup();
  Ok(days)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeekdayCode {
  pub sun: u8,
  pub iso: u8,
  pub abbr: String,
  pub name: String,
}

impl WeekdayCode {
  pub fn new(day: WeekdayIndex) -> Self {
    let sun = day.value();
    let iso = if sun == 0 { 7 } else { sun };
    WeekdayCode {
      sun,
      iso,
      abbr: WEEKDAY_ABBRS[sun as usize].to_string(),
      name: day.name_tr().to_string(),
    }
  }
}
