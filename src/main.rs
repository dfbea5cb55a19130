mod app;
mod args;
mod constants;
mod data;
mod error;
mod lib;
mod query_params;
mod routes;
mod services;
mod state;

use args::*;
use clap::Parser;
use actix_web::{middleware, App, HttpServer, web::{self, Data}};
use data::{mysql::*, schema::init_schema};
use error::AppError;
use routes::*;
use state::AppState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenv::dotenv().ok();
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();
  let db_params = parse_db_options(&args);
  let pool = connect_pool(&db_params).map_err(|e| {
    error!("Cannot open database pool: {}", e);
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
  })?;
  if args.init_schema {
    let mut conn = pool.get_conn().map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    init_schema(&mut conn).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
  }
  let state = Data::new(AppState::new(pool, match_whatsapp_phone(&args)));
  let port = args.webport;
  info!("Listening on {}:{}", args.bind, port);

  HttpServer::new(move || {
    App::new()
      .app_data(state.clone())
      .app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()))
      .app_data(web::QueryConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()))
      .wrap(middleware::Logger::default())
      .route("/", web::get().to(welcome))
      .service(delivery_dates)
      .service(cart_summary)
      .service(list_categories)
      .service(create_category)
      .service(get_category)
      .service(update_category)
      .service(delete_category)
      .service(list_products)
      .service(create_product)
      .service(get_product)
      .service(update_product)
      .service(delete_product)
      .service(list_regions)
      .service(create_region)
      .service(get_region)
      .service(update_region)
      .service(delete_region)
      .service(list_neighborhoods)
      .service(create_neighborhood)
      .service(neighborhood_delivery_dates)
      .service(get_neighborhood)
      .service(update_neighborhood)
      .service(delete_neighborhood)
      .service(list_addresses)
      .service(create_address)
      .service(update_address)
      .service(get_address_detail)
      .service(list_orders)
      .service(create_order)
      .service(deliver_today)
      .service(delivered_today)
      .service(get_order)
      .service(update_order_status)
      .default_service(web::to(route_not_found))
  })
  .bind((args.bind.as_str(), port))?
  .run()
  .await
}
