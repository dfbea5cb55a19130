use mysql::prelude::*;
use mysql::{params, PooledConn};
use serde::{Serialize, Deserialize};
use tracing::info;

use super::regions::{get_neighborhood, get_region, Neighborhood, Region};
use super::require_text;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
  pub id: u64,
  pub user_id: String,
  pub city: String,
  pub line: String,
  pub region_id: u64,
  pub neighborhood_id: Option<u64>,
  pub is_region_available: bool,
}

impl Address {
  pub fn full_address(&self) -> String {
    format!("{}, {}", self.city, self.line)
  }
}

type AddressRow = (u64, String, String, String, u64, Option<u64>, bool);

fn address_from_row(row: AddressRow) -> Address {
  let (id, user_id, city, line, region_id, neighborhood_id, is_region_available) = row;
  Address { id, user_id, city, line, region_id, neighborhood_id, is_region_available }
}

const ADDRESS_COLUMNS: &'static str = "id, user_id, city, line, region_id, neighborhood_id, is_region_available";

/// Address joined with the region and neighborhood it is served from.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressDetail {
  pub address: Address,
  pub region: Region,
  pub neighborhood: Neighborhood,
  pub full_address: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
  pub city: Option<String>,
  pub line: Option<String>,
  pub region_id: Option<u64>,
  pub neighborhood_id: Option<u64>,
}

struct AddressFields {
  city: String,
  line: String,
  region_id: u64,
  neighborhood_id: Option<u64>,
}

fn validate_input(conn: &mut PooledConn, input: &AddressInput) -> Result<AddressFields, AppError> {
  let city = require_text(&input.city, "city")?;
  let line = require_text(&input.line, "line")?;
  let region_id = input.region_id.ok_or(AppError::MissingField("regionId"))?;
  get_region(conn, region_id).map_err(|_| AppError::BadRequest("Invalid region ID".to_string()))?;
  if let Some(neighborhood_id) = input.neighborhood_id {
    let neighborhood = get_neighborhood(conn, neighborhood_id)?;
    if neighborhood.region_id != region_id {
      return Err(AppError::BadRequest("Neighborhood does not belong to the region".to_string()));
    }
  }
  Ok(AddressFields { city, line, region_id, neighborhood_id: input.neighborhood_id })
}

pub fn list_addresses(conn: &mut PooledConn, user_id: &str) -> Result<Vec<Address>, AppError> {
  let sql = format!("SELECT {} FROM addresses WHERE user_id = :user_id ORDER BY id", ADDRESS_COLUMNS);
  let rows: Vec<AddressRow> = conn.exec(sql, params! { "user_id" => user_id })?;
  Ok(rows.into_iter().map(address_from_row).collect())
}

pub fn create_address(conn: &mut PooledConn, user_id: &str, input: &AddressInput) -> Result<Address, AppError> {
  let fields = validate_input(conn, input)?;
  conn.exec_drop(
    "INSERT INTO addresses (user_id, city, line, region_id, neighborhood_id, is_region_available)
    VALUES (:user_id, :city, :line, :region_id, :neighborhood_id, 1)",
    params! {
      "user_id" => user_id,
      "city" => fields.city.as_str(),
      "line" => fields.line.as_str(),
      "region_id" => fields.region_id,
      "neighborhood_id" => fields.neighborhood_id,
    },
  )?;
  let address = Address {
    id: conn.last_insert_id(),
    user_id: user_id.to_string(),
    city: fields.city,
    line: fields.line,
    region_id: fields.region_id,
    neighborhood_id: fields.neighborhood_id,
    is_region_available: true,
  };
  info!("Created address {} for {}", address.id, user_id);
  Ok(address)
}

/// Rewrites every address of the user, returning how many changed.
pub fn update_user_addresses(conn: &mut PooledConn, user_id: &str, input: &AddressInput) -> Result<u64, AppError> {
  let fields = validate_input(conn, input)?;
  let existing = list_addresses(conn, user_id)?;
  if existing.is_empty() {
    return Err(AppError::NotFound("Address"));
  }
  conn.exec_drop(
    "UPDATE addresses SET city = :city, line = :line, region_id = :region_id,
    neighborhood_id = :neighborhood_id, is_region_available = 1 WHERE user_id = :user_id",
    params! {
      "user_id" => user_id,
      "city" => fields.city.as_str(),
      "line" => fields.line.as_str(),
      "region_id" => fields.region_id,
      "neighborhood_id" => fields.neighborhood_id,
    },
  )?;
  Ok(existing.len() as u64)
}

/*
* First address of the user with its region and neighborhood.
* None when the user has no address or it is not attached to a neighborhood yet.
*/
pub fn find_address_detail(conn: &mut PooledConn, user_id: &str) -> Result<Option<AddressDetail>, AppError> {
  let address = match list_addresses(conn, user_id)?.into_iter().next() {
    Some(address) => address,
    None => return Ok(None),
  };
  let neighborhood_id = match address.neighborhood_id {
    Some(id) => id,
    None => return Ok(None),
  };
  let region = match get_region(conn, address.region_id) {
    Ok(region) => region,
    Err(AppError::NotFound(_)) => return Ok(None),
    Err(e) => return Err(e),
  };
  let neighborhood = match get_neighborhood(conn, neighborhood_id) {
    Ok(neighborhood) => neighborhood,
    Err(AppError::NotFound(_)) => return Ok(None),
    Err(e) => return Err(e),
  };
  let full_address = address.full_address();
  Ok(Some(AddressDetail { address, region, neighborhood, full_address }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_row_and_full_address() {
    let address = address_from_row((3, "user_1".to_string(), "İstanbul".to_string(), "Moda Cd. 12".to_string(), 2, Some(7), true));
    assert_eq!(address.full_address(), "İstanbul, Moda Cd. 12");
    let value = serde_json::to_value(&address).unwrap();
    assert_eq!(value["neighborhoodId"], 7);
    assert_eq!(value["isRegionAvailable"], true);
  }
}
