use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::constants::*;
use crate::error::AppError;

/// Identity forwarded by the upstream identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
  pub user_id: String,
  pub role: String,
  pub name: Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
}

fn header_value(req: &HttpRequest, key: &str) -> Option<String> {
  req.headers()
    .get(key)
    .and_then(|v| v.to_str().ok())
    .map(|v| v.trim().to_string())
    .filter(|v| v.len() > 0)
}

impl Session {
  pub fn from_request_headers(req: &HttpRequest) -> Result<Session, AppError> {
    let user_id = header_value(req, HEADER_USER_ID).ok_or(AppError::NotAuthenticated)?;
    Ok(Session {
      user_id,
      role: header_value(req, HEADER_USER_ROLE).unwrap_or_default(),
      name: header_value(req, HEADER_USER_NAME),
      email: header_value(req, HEADER_USER_EMAIL),
      phone: header_value(req, HEADER_USER_PHONE),
    })
  }

  pub fn is_admin(&self) -> bool {
    self.role == ADMIN_ROLE
  }

  pub fn require_admin(&self) -> Result<(), AppError> {
    if self.is_admin() {
      Ok(())
    } else {
      Err(AppError::Forbidden)
    }
  }

  /// Owners see their own records, admins see everything.
  pub fn require_owner_or_admin(&self, owner_id: &str) -> Result<(), AppError> {
    if self.is_admin() || self.user_id == owner_id {
      Ok(())
    } else {
      Err(AppError::Forbidden)
    }
  }
}

impl FromRequest for Session {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(Session::from_request_headers(req))
  }
}

/// Admin-only extractor, rejects with 401 or 403 before the handler runs.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl FromRequest for AdminSession {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(Session::from_request_headers(req).and_then(|session| {
      session.require_admin()?;
      Ok(AdminSession(session))
    }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn test_missing_user_is_not_authenticated() {
    let req = TestRequest::default().to_http_request();
    assert!(matches!(Session::from_request_headers(&req), Err(AppError::NotAuthenticated)));
    let req = TestRequest::default().insert_header((HEADER_USER_ID, "  ")).to_http_request();
    assert!(matches!(Session::from_request_headers(&req), Err(AppError::NotAuthenticated)));
  }

  #[test]
  fn test_customer_session() {
    let req = TestRequest::default()
      .insert_header((HEADER_USER_ID, "user_1"))
      .insert_header((HEADER_USER_NAME, "Ayse"))
      .to_http_request();
    let session = Session::from_request_headers(&req).unwrap();
    assert_eq!(session.user_id, "user_1");
    assert_eq!(session.name.as_deref(), Some("Ayse"));
    assert!(!session.is_admin());
    assert!(matches!(session.require_admin(), Err(AppError::Forbidden)));
    assert!(session.require_owner_or_admin("user_1").is_ok());
    assert!(session.require_owner_or_admin("user_2").is_err());
  }

  #[test]
  fn test_admin_session() {
    let req = TestRequest::default()
      .insert_header((HEADER_USER_ID, "boss"))
      .insert_header((HEADER_USER_ROLE, "admin"))
      .to_http_request();
    let session = Session::from_request_headers(&req).unwrap();
    assert!(session.require_admin().is_ok());
    assert!(session.require_owner_or_admin("someone").is_ok());
  }
}
