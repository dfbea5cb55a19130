use actix_web::{
  error::BlockingError,
  http::StatusCode,
  HttpResponse, ResponseError,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::app::weekday_code::InvalidWeekdayError;

#[derive(Error, Debug)]
pub enum AppError {
  #[error("Not authenticated!")]
  NotAuthenticated,

  #[error("You are not allowed!")]
  Forbidden,

  #[error("{0} not found")]
  NotFound(&'static str),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("Missing required field: {0}")]
  MissingField(&'static str),

  #[error(transparent)]
  InvalidWeekday(#[from] InvalidWeekdayError),

  #[error("Delivery is not available on {0}")]
  DeliveryDateUnavailable(NaiveDate),

  #[error("Neighborhood {neighborhood_id} has a malformed delivery schedule: {reason}")]
  MalformedSchedule {
    neighborhood_id: u64,
    reason: String,
  },

  #[error("Stored value is invalid: {0}")]
  InvalidStoredValue(String),

  #[error("Database error: {0}")]
  Database(#[from] mysql::Error),

  #[error("Worker pool error: {0}")]
  Blocking(#[from] BlockingError),
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
      AppError::Forbidden => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::BadRequest(_) | AppError::MissingField(_) | AppError::InvalidWeekday(_) => StatusCode::BAD_REQUEST,
      AppError::DeliveryDateUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::MalformedSchedule { .. } | AppError::InvalidStoredValue(_) | AppError::Database(_) | AppError::Blocking(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      error!("{}", self);
    }
    // internals stay in the log
    let message = match self {
      AppError::Database(_) | AppError::Blocking(_) => "Something went wrong!".to_string(),
      _ => self.to_string(),
    };
    HttpResponse::build(status).json(json!({ "valid": false, "message": message }))
  }
}
