use chrono::{Duration, NaiveDate};
use serde::{Serialize, Deserialize};

use super::weekday_code::*;
use crate::lib::date_conv::{current_date, delivery_day_label};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDateCandidate {
  pub date: NaiveDate,
  pub selectable: bool,
  pub is_rollover_of_today: bool,
  pub weekday: WeekdayCode,
  pub label: String,
}

impl DeliveryDateCandidate {
  fn new(today: NaiveDate, date: NaiveDate) -> Self {
    DeliveryDateCandidate {
      date,
      selectable: date != today,
      is_rollover_of_today: date == today + Duration::days(7),
      weekday: WeekdayCode::new(WeekdayIndex::of(&date)),
      label: delivery_day_label(&date),
    }
  }
}

/**
 * Concrete delivery dates for the weekdays a neighborhood serves, relative to `today`.
 * Each weekday resolves to its nearest occurrence on or after today. When today's weekday
 * is served, today is listed but not selectable and the same weekday next week is added.
 * Any index outside 0-6 fails the whole call.
 */
pub fn delivery_date_candidates(today: NaiveDate, allowed_weekdays: &[i64]) -> Result<Vec<DeliveryDateCandidate>, InvalidWeekdayError> {
  let days = to_weekday_set(allowed_weekdays)?;
  Ok(candidates_for_schedule(today, &days))
}

pub fn candidates_for_schedule(today: NaiveDate, days: &[WeekdayIndex]) -> Vec<DeliveryDateCandidate> {
  let today_weekday = WeekdayIndex::of(&today);
  let mut dates: Vec<NaiveDate> = Vec::with_capacity(days.len() + 1);
  for day in days {
    let offset = day.days_after(today_weekday);
    dates.push(today + Duration::days(offset));
    if offset == 0 {
      dates.push(today + Duration::days(7));
    }
  }
  dates.sort();
  dates.dedup();
  dates.into_iter().map(|date| DeliveryDateCandidate::new(today, date)).collect()
}

pub fn upcoming_delivery_dates(allowed_weekdays: &[i64]) -> Result<Vec<DeliveryDateCandidate>, InvalidWeekdayError> {
  delivery_date_candidates(current_date(), allowed_weekdays)
}

/// True when `chosen` is one of the selectable candidates for `today`.
pub fn is_selectable_delivery_date(today: NaiveDate, days: &[WeekdayIndex], chosen: &NaiveDate) -> bool {
  candidates_for_schedule(today, days).iter().any(|c| c.selectable && c.date == *chosen)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  // 2024-10-23 is a Wednesday
  fn wednesday() -> NaiveDate {
    ymd(2024, 10, 23)
  }

  fn summary(candidates: &[DeliveryDateCandidate]) -> Vec<(NaiveDate, bool, bool)> {
    candidates.iter().map(|c| (c.date, c.selectable, c.is_rollover_of_today)).collect()
  }

  #[test]
  fn test_wednesday_mon_wed_fri() {
    let candidates = delivery_date_candidates(wednesday(), &[1, 3, 5]).unwrap();
    assert_eq!(summary(&candidates), vec![
      (ymd(2024, 10, 23), false, false),
      (ymd(2024, 10, 25), true, false),
      (ymd(2024, 10, 28), true, false),
      (ymd(2024, 10, 30), true, true),
    ]);
    assert_eq!(candidates[1].weekday.name, "Cuma");
    assert_eq!(candidates[2].label, "Pazartesi - 28 Ekim 2024");
  }

  #[test]
  fn test_empty_schedule() {
    let sunday = ymd(2024, 10, 20);
    assert!(delivery_date_candidates(sunday, &[]).unwrap().is_empty());
  }

  #[test]
  fn test_only_todays_weekday() {
    let monday = ymd(2024, 10, 21);
    let candidates = delivery_date_candidates(monday, &[1]).unwrap();
    assert_eq!(summary(&candidates), vec![
      (monday, false, false),
      (ymd(2024, 10, 28), true, true),
    ]);
  }

  #[test]
  fn test_duplicates_collapse() {
    let with_dupes = delivery_date_candidates(wednesday(), &[2, 2, 4]).unwrap();
    let plain = delivery_date_candidates(wednesday(), &[2, 4]).unwrap();
    assert_eq!(with_dupes, plain);
  }

  #[test]
  fn test_invalid_weekday_fails_without_output() {
    assert_eq!(delivery_date_candidates(wednesday(), &[8]), Err(InvalidWeekdayError(8)));
    assert_eq!(delivery_date_candidates(wednesday(), &[1, 3, -2]), Err(InvalidWeekdayError(-2)));
  }

  #[test]
  fn test_count_and_window_for_every_schedule_and_weekday() {
    for start in 0..7 {
      let today = ymd(2024, 10, 20) + Duration::days(start);
      let today_weekday = WeekdayIndex::of(&today).value() as i64;
      for mask in 0u8..128 {
        let allowed: Vec<i64> = (0..7).filter(|d| mask & (1u8 << *d) != 0).collect();
        let candidates = delivery_date_candidates(today, &allowed).unwrap();
        let extra = if allowed.contains(&today_weekday) { 1 } else { 0 };
        assert_eq!(candidates.len(), allowed.len() + extra);
        assert!(candidates.iter().all(|c| c.date >= today && c.date <= today + Duration::days(13)));
        let todays: Vec<_> = candidates.iter().filter(|c| c.date == today).collect();
        assert!(todays.len() <= 1);
        assert!(todays.iter().all(|c| !c.selectable));
        assert!(candidates.windows(2).all(|w| w[0].date < w[1].date));
      }
    }
  }

  #[test]
  fn test_upcoming_from_local_date() {
    let today = current_date();
    let candidates = upcoming_delivery_dates(&[0, 1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(candidates.len(), 8);
    assert_eq!(candidates[0].date, today);
    assert!(!candidates[0].selectable);
    assert!(candidates[7].is_rollover_of_today);
  }

  #[test]
  fn test_repeat_calls_match() {
    let first = delivery_date_candidates(wednesday(), &[6, 0, 3]).unwrap();
    let second = delivery_date_candidates(wednesday(), &[6, 0, 3]).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn test_selectable_delivery_date() {
    let days = to_weekday_set(&[1, 3, 5]).unwrap();
    let today = wednesday();
    assert!(!is_selectable_delivery_date(today, &days, &today));
    assert!(is_selectable_delivery_date(today, &days, &ymd(2024, 10, 25)));
    assert!(is_selectable_delivery_date(today, &days, &ymd(2024, 10, 30)));
    // Thursday is not served
    assert!(!is_selectable_delivery_date(today, &days, &ymd(2024, 10, 24)));
    // past and beyond the offered window
    assert!(!is_selectable_delivery_date(today, &days, &ymd(2024, 10, 21)));
    assert!(!is_selectable_delivery_date(today, &days, &ymd(2024, 11, 1)));
    assert!(!is_selectable_delivery_date(today, &[], &ymd(2024, 10, 25)));
  }
}
