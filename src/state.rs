use actix_web::web;
use mysql::{Pool, PooledConn};

use crate::error::AppError;

pub struct AppState {
  pub pool: Pool,
  pub whatsapp_phone: String,
}

impl AppState {
  pub fn new(pool: Pool, whatsapp_phone: String) -> Self {
    AppState { pool, whatsapp_phone }
  }

  /// Runs blocking database work on the actix thread pool.
  pub async fn with_conn<T, F>(&self, f: F) -> Result<T, AppError>
  where
    F: FnOnce(&mut PooledConn) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
  {
    let pool = self.pool.clone();
    web::block(move || {
      let mut conn = pool.get_conn()?;
      f(&mut conn)
    })
    .await?
  }
}
