use mysql::prelude::*;
use mysql::{params, PooledConn};
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::app::session::Session;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: String,
  pub name: String,
  pub email: String,
  pub phone_number: String,
}

impl User {
  pub fn from_session(session: &Session) -> User {
    User {
      id: session.user_id.clone(),
      name: session.name.clone().unwrap_or("Unknown Name".to_string()),
      email: session.email.clone().unwrap_or("Unknown Email".to_string()),
      phone_number: session.phone.clone().unwrap_or("Unknown Phone".to_string()),
    }
  }
}

pub fn get_user(conn: &mut PooledConn, id: &str) -> Result<Option<User>, AppError> {
  let row: Option<(String, String, String, String)> = conn.exec_first(
    "SELECT id, name, email, phone_number FROM users WHERE id = :id",
    params! { "id" => id },
  )?;
  Ok(row.map(|(id, name, email, phone_number)| User { id, name, email, phone_number }))
}

/// Stores the identity provider's profile the first time a user saves an address.
pub fn ensure_user(conn: &mut PooledConn, session: &Session) -> Result<User, AppError> {
  if let Some(user) = get_user(conn, &session.user_id)? {
    return Ok(user);
  }
  let user = User::from_session(session);
  conn.exec_drop(
    "INSERT INTO users (id, name, email, phone_number) VALUES (:id, :name, :email, :phone_number)",
    params! {
      "id" => user.id.as_str(),
      "name" => user.name.as_str(),
      "email" => user.email.as_str(),
      "phone_number" => user.phone_number.as_str(),
    },
  )?;
  info!("Registered user {}", user.id);
  Ok(user)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_session_fills_unknowns() {
    let session = Session {
      user_id: "user_1".to_string(),
      role: String::new(),
      name: Some("Ali Veli".to_string()),
      email: None,
      phone: None,
    };
    let user = User::from_session(&session);
    assert_eq!(user.name, "Ali Veli");
    assert_eq!(user.email, "Unknown Email");
    assert_eq!(user.phone_number, "Unknown Phone");
  }
}
