use mysql::prelude::*;
use mysql::{params, PooledConn};
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use super::require_text;
use crate::app::weekday_code::{to_weekday_set, WeekdayIndex};
use crate::error::AppError;
use crate::lib::json_extract::parse_i64_list;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Region {
  pub id: u64,
  pub name: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RegionDetail {
  #[serde(flatten)]
  pub region: Region,
  pub neighborhoods: Vec<Neighborhood>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Neighborhood {
  pub id: u64,
  pub region_id: u64,
  pub name: String,
  pub delivery_days: Vec<i64>,
  pub start_time: String,
  pub end_time: String,
  #[serde(skip)]
  pub stored_days: String,
}

type NeighborhoodRow = (u64, u64, String, String, String, String);

impl Neighborhood {
  pub fn from_row(row: NeighborhoodRow) -> Neighborhood {
    let (id, region_id, name, stored_days, start_time, end_time) = row;
    let delivery_days = match parse_i64_list(&stored_days) {
      Ok(days) => {
        let mut days = days;
        days.sort();
        days.dedup();
        days
      },
      Err(reason) => {
        warn!("Neighborhood {} delivery days unreadable: {}", id, reason);
        vec![]
      }
    };
    Neighborhood { id, region_id, name, delivery_days, start_time, end_time, stored_days }
  }

  /// Validated delivery weekdays; a stored value the scheduler cannot use is a data fault.
  pub fn schedule(&self) -> Result<Vec<WeekdayIndex>, AppError> {
    let raw = parse_i64_list(&self.stored_days)
      .map_err(|reason| AppError::MalformedSchedule { neighborhood_id: self.id, reason })?;
    to_weekday_set(&raw)
      .map_err(|e| AppError::MalformedSchedule { neighborhood_id: self.id, reason: e.to_string() })
  }
}

const NEIGHBORHOOD_COLUMNS: &'static str = "id, region_id, name, delivery_days, start_time, end_time";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RegionInput {
  pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodInput {
  pub region_id: Option<u64>,
  pub name: Option<String>,
  pub delivery_days: Option<Vec<i64>>,
  pub start_time: Option<String>,
  pub end_time: Option<String>,
}

fn is_clock_time(value: &str) -> bool {
  let parts: Vec<&str> = value.split(":").collect();
  if parts.len() != 2 || parts.iter().any(|p| p.len() != 2) {
    return false;
  }
  match (parts[0].parse::<u8>(), parts[1].parse::<u8>()) {
    (Ok(h), Ok(m)) => h < 24 && m < 60,
    _ => false,
  }
}

fn require_clock_time(value: &Option<String>, field: &'static str) -> Result<String, AppError> {
  let time = require_text(value, field)?;
  if is_clock_time(&time) {
    Ok(time)
  } else {
    Err(AppError::BadRequest(format!("{} must be HH:MM, got {}", field, time)))
  }
}

/// Normalised neighborhood fields ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodFields {
  pub name: String,
  pub delivery_days: Vec<WeekdayIndex>,
  pub start_time: String,
  pub end_time: String,
}

impl NeighborhoodFields {
  pub fn stored_days(&self) -> String {
    let days: Vec<u8> = self.delivery_days.iter().map(|d| d.value()).collect();
    serde_json::to_string(&days).unwrap_or_else(|_| "[]".to_string())
  }
}

impl NeighborhoodInput {
  pub fn to_fields(&self) -> Result<NeighborhoodFields, AppError> {
    let name = require_text(&self.name, "name")?;
    let days = self.delivery_days.as_ref().ok_or(AppError::MissingField("deliveryDays"))?;
    let delivery_days = to_weekday_set(days)?;
    let start_time = require_clock_time(&self.start_time, "startTime")?;
    let end_time = require_clock_time(&self.end_time, "endTime")?;
    if start_time >= end_time {
      return Err(AppError::BadRequest("startTime must be before endTime".to_string()));
    }
    Ok(NeighborhoodFields { name, delivery_days, start_time, end_time })
  }
}

pub fn list_regions(conn: &mut PooledConn) -> Result<Vec<Region>, AppError> {
  let rows = conn.query_map("SELECT id, name FROM regions ORDER BY name", |(id, name)| Region { id, name })?;
  Ok(rows)
}

pub fn get_region(conn: &mut PooledConn, id: u64) -> Result<Region, AppError> {
  let row: Option<(u64, String)> = conn.exec_first("SELECT id, name FROM regions WHERE id = :id", params! { "id" => id })?;
  match row {
    Some((id, name)) => Ok(Region { id, name }),
    None => Err(AppError::NotFound("Region")),
  }
}

pub fn get_region_detail(conn: &mut PooledConn, id: u64) -> Result<RegionDetail, AppError> {
  let region = get_region(conn, id)?;
  let neighborhoods = list_neighborhoods(conn, id)?;
  Ok(RegionDetail { region, neighborhoods })
}

pub fn create_region(conn: &mut PooledConn, input: &RegionInput) -> Result<Region, AppError> {
  let name = require_text(&input.name, "name")?;
  conn.exec_drop("INSERT INTO regions (name) VALUES (:name)", params! { "name" => name.as_str() })?;
  let region = Region { id: conn.last_insert_id(), name };
  info!("Created region {} ({})", region.name, region.id);
  Ok(region)
}

pub fn update_region(conn: &mut PooledConn, id: u64, input: &RegionInput) -> Result<Region, AppError> {
  let name = require_text(&input.name, "name")?;
  get_region(conn, id)?;
  conn.exec_drop("UPDATE regions SET name = :name WHERE id = :id", params! { "name" => name.as_str(), "id" => id })?;
  Ok(Region { id, name })
}

pub fn delete_region(conn: &mut PooledConn, id: u64) -> Result<(), AppError> {
  get_region(conn, id)?;
  let mut tx = conn.start_transaction(mysql::TxOpts::default())?;
  tx.exec_drop(
    "DELETE FROM addresses WHERE region_id = :id",
    params! { "id" => id },
  )?;
  tx.exec_drop("DELETE FROM neighborhoods WHERE region_id = :id", params! { "id" => id })?;
  tx.exec_drop("DELETE FROM regions WHERE id = :id", params! { "id" => id })?;
  tx.commit()?;
  info!("Deleted region {}", id);
  Ok(())
}

pub fn list_neighborhoods(conn: &mut PooledConn, region_id: u64) -> Result<Vec<Neighborhood>, AppError> {
  let sql = format!("SELECT {} FROM neighborhoods WHERE region_id = :region_id ORDER BY name", NEIGHBORHOOD_COLUMNS);
  let rows: Vec<NeighborhoodRow> = conn.exec(sql, params! { "region_id" => region_id })?;
  Ok(rows.into_iter().map(Neighborhood::from_row).collect())
}

pub fn get_neighborhood(conn: &mut PooledConn, id: u64) -> Result<Neighborhood, AppError> {
  let sql = format!("SELECT {} FROM neighborhoods WHERE id = :id", NEIGHBORHOOD_COLUMNS);
  let row: Option<NeighborhoodRow> = conn.exec_first(sql, params! { "id" => id })?;
  row.map(Neighborhood::from_row).ok_or(AppError::NotFound("Neighborhood"))
}

fn neighborhood_name_taken(conn: &mut PooledConn, region_id: u64, name: &str, except_id: u64) -> Result<bool, AppError> {
  let found: Option<u64> = conn.exec_first(
    "SELECT id FROM neighborhoods WHERE region_id = :region_id AND name = :name AND id <> :id",
    params! { "region_id" => region_id, "name" => name, "id" => except_id },
  )?;
  Ok(found.is_some())
}

pub fn create_neighborhood(conn: &mut PooledConn, input: &NeighborhoodInput) -> Result<Neighborhood, AppError> {
  let region_id = input.region_id.ok_or(AppError::MissingField("regionId"))?;
  let fields = input.to_fields()?;
  get_region(conn, region_id)?;
  if neighborhood_name_taken(conn, region_id, &fields.name, 0)? {
    return Err(AppError::Conflict("Neighborhood with the same name already exists in this region".to_string()));
  }
  conn.exec_drop(
    "INSERT INTO neighborhoods (region_id, name, delivery_days, start_time, end_time)
    VALUES (:region_id, :name, :delivery_days, :start_time, :end_time)",
    params! {
      "region_id" => region_id,
      "name" => fields.name.as_str(),
      "delivery_days" => fields.stored_days(),
      "start_time" => fields.start_time.as_str(),
      "end_time" => fields.end_time.as_str(),
    },
  )?;
  let id = conn.last_insert_id();
  info!("Created neighborhood {} in region {}", fields.name, region_id);
  get_neighborhood(conn, id)
}

pub fn update_neighborhood(conn: &mut PooledConn, id: u64, input: &NeighborhoodInput) -> Result<Neighborhood, AppError> {
  let fields = input.to_fields()?;
  let current = get_neighborhood(conn, id)?;
  if neighborhood_name_taken(conn, current.region_id, &fields.name, id)? {
    return Err(AppError::Conflict("Neighborhood with the same name already exists in this region".to_string()));
  }
  conn.exec_drop(
    "UPDATE neighborhoods SET name = :name, delivery_days = :delivery_days,
    start_time = :start_time, end_time = :end_time WHERE id = :id",
    params! {
      "id" => id,
      "name" => fields.name.as_str(),
      "delivery_days" => fields.stored_days(),
      "start_time" => fields.start_time.as_str(),
      "end_time" => fields.end_time.as_str(),
    },
  )?;
  get_neighborhood(conn, id)
}

/// Removes the neighborhood together with the addresses pointing at it.
pub fn delete_neighborhood(conn: &mut PooledConn, id: u64) -> Result<(), AppError> {
  get_neighborhood(conn, id)?;
  let mut tx = conn.start_transaction(mysql::TxOpts::default())?;
  tx.exec_drop("DELETE FROM addresses WHERE neighborhood_id = :id", params! { "id" => id })?;
  tx.exec_drop("DELETE FROM neighborhoods WHERE id = :id", params! { "id" => id })?;
  tx.commit()?;
  info!("Deleted neighborhood {}", id);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(days: &str) -> NeighborhoodRow {
    (7, 2, "Moda".to_string(), days.to_string(), "09:00".to_string(), "18:00".to_string())
  }

  #[test]
  fn test_from_row_reads_legacy_days() {
    let hood = Neighborhood::from_row(row(r#"["5", "1,3", 3]"#));
    assert_eq!(hood.delivery_days, vec![1, 3, 5]);
    assert_eq!(hood.schedule().unwrap().iter().map(|d| d.value()).collect::<Vec<_>>(), vec![1, 3, 5]);
  }

  #[test]
  fn test_schedule_rejects_out_of_range() {
    let hood = Neighborhood::from_row(row("[1, 9]"));
    assert!(matches!(hood.schedule(), Err(AppError::MalformedSchedule { neighborhood_id: 7, .. })));
    let unreadable = Neighborhood::from_row(row(r#"["Pazartesi"]"#));
    assert!(unreadable.delivery_days.is_empty());
    assert!(unreadable.schedule().is_err());
  }

  #[test]
  fn test_empty_schedule_is_valid() {
    let hood = Neighborhood::from_row(row("[]"));
    assert!(hood.schedule().unwrap().is_empty());
  }

  #[test]
  fn test_input_to_fields() {
    let input = NeighborhoodInput {
      region_id: Some(2),
      name: Some(" Moda ".to_string()),
      delivery_days: Some(vec![5, 1, 5]),
      start_time: Some("09:00".to_string()),
      end_time: Some("17:30".to_string()),
    };
    let fields = input.to_fields().unwrap();
    assert_eq!(fields.name, "Moda");
    assert_eq!(fields.stored_days(), "[1,5]");

    let bad_day = NeighborhoodInput { delivery_days: Some(vec![7]), ..input.clone() };
    assert!(matches!(bad_day.to_fields(), Err(AppError::InvalidWeekday(_))));
    let bad_time = NeighborhoodInput { end_time: Some("25:00".to_string()), ..input.clone() };
    assert!(matches!(bad_time.to_fields(), Err(AppError::BadRequest(_))));
    let reversed = NeighborhoodInput { start_time: Some("18:00".to_string()), ..input.clone() };
    assert!(matches!(reversed.to_fields(), Err(AppError::BadRequest(_))));
    let no_days = NeighborhoodInput { delivery_days: None, ..input };
    assert!(matches!(no_days.to_fields(), Err(AppError::MissingField("deliveryDays"))));
  }

  #[test]
  fn test_region_detail_json_is_flat() {
    let detail = RegionDetail {
      region: Region { id: 2, name: "Kadıköy".to_string() },
      neighborhoods: vec![Neighborhood::from_row(row("[1]"))],
    };
    let value = serde_json::to_value(&detail).unwrap();
    assert_eq!(value["name"], "Kadıköy");
    assert_eq!(value["neighborhoods"][0]["deliveryDays"], serde_json::json!([1]));
    assert!(value["neighborhoods"][0].get("storedDays").is_none());
  }
}
