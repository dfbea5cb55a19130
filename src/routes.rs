use actix_web::{get, post, put, delete, HttpResponse, Responder, web::{Data, Json, Path, Query}};
use serde_json::*;
use tracing::debug;

use crate::app::{cart::*, checkout::CheckoutRequest, delivery_dates::*, session::*};
use crate::error::AppError;
use crate::lib::date_conv::current_date;
use crate::query_params::*;
use crate::services::{addresses, catalog, orders, regions, users};
use crate::state::AppState;

type HandlerResult = std::result::Result<HttpResponse, AppError>;

pub async fn welcome() -> impl Responder {
  Json(json!({ "message": "Welcome to FreshCart" }))
}

pub async fn route_not_found() -> impl Responder {
  HttpResponse::NotFound().json(json!({ "valid": false, "error": "route not found" }))
}

fn candidates_json(today: chrono::NaiveDate, candidates: Vec<DeliveryDateCandidate>) -> Value {
  let selectable = candidates.iter().filter(|c| c.selectable).count();
  json!({
    "today": today,
    "count": candidates.len(),
    "selectable": selectable,
    "candidates": candidates
  })
}

#[get("/api/delivery-dates")]
pub async fn delivery_dates(params: Query<InputOptions>) -> HandlerResult {
  let today = match_today_from_params(&params);
  let days = match_days_from_params(&params)?;
  let candidates = match params.dt {
    Some(_) => delivery_date_candidates(today, &days)?,
    None => upcoming_delivery_dates(&days)?,
  };
  debug!("{} delivery candidates for {:?} from {}", candidates.len(), days, today);
  Ok(HttpResponse::Ok().json(candidates_json(today, candidates)))
}

#[get("/api/neighborhoods/{id}/delivery-dates")]
pub async fn neighborhood_delivery_dates(state: Data<AppState>, path: Path<u64>, params: Query<InputOptions>) -> HandlerResult {
  let id = path.into_inner();
  let today = match_today_from_params(&params);
  let neighborhood = state.with_conn(move |conn| regions::get_neighborhood(conn, id)).await?;
  let schedule = neighborhood.schedule()?;
  let candidates = candidates_for_schedule(today, &schedule);
  let mut info = candidates_json(today, candidates);
  info["neighborhood"] = json!(neighborhood);
  Ok(HttpResponse::Ok().json(info))
}

#[post("/api/cart/summary")]
pub async fn cart_summary(lines: Json<Vec<CartLine>>) -> HandlerResult {
  let cart = Cart::from_lines(lines.into_inner())?;
  Ok(HttpResponse::Ok().json(cart))
}

// Catalog

#[get("/api/categories")]
pub async fn list_categories(state: Data<AppState>) -> HandlerResult {
  let rows = state.with_conn(catalog::list_categories).await?;
  Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/categories")]
pub async fn create_category(_admin: AdminSession, state: Data<AppState>, input: Json<catalog::CategoryInput>) -> HandlerResult {
  let input = input.into_inner();
  let category = state.with_conn(move |conn| catalog::create_category(conn, &input)).await?;
  Ok(HttpResponse::Created().json(category))
}

#[get("/api/categories/{id}")]
pub async fn get_category(state: Data<AppState>, path: Path<String>) -> HandlerResult {
  let id = path.into_inner();
  let category = state.with_conn(move |conn| catalog::get_category(conn, &id)).await?;
  Ok(HttpResponse::Ok().json(category))
}

#[put("/api/categories/{id}")]
pub async fn update_category(_admin: AdminSession, state: Data<AppState>, path: Path<String>, input: Json<catalog::CategoryInput>) -> HandlerResult {
  let (id, input) = (path.into_inner(), input.into_inner());
  let category = state.with_conn(move |conn| catalog::update_category(conn, &id, &input)).await?;
  Ok(HttpResponse::Ok().json(category))
}

#[delete("/api/categories/{id}")]
pub async fn delete_category(_admin: AdminSession, state: Data<AppState>, path: Path<String>) -> HandlerResult {
  let id = path.into_inner();
  state.with_conn(move |conn| catalog::delete_category(conn, &id)).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Category deleted successfully!" })))
}

#[get("/api/products")]
pub async fn list_products(state: Data<AppState>, params: Query<InputOptions>) -> HandlerResult {
  let cat = match_category_from_params(&params);
  let rows = state.with_conn(move |conn| catalog::list_products(conn, cat.as_deref())).await?;
  Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/products")]
pub async fn create_product(_admin: AdminSession, state: Data<AppState>, input: Json<catalog::ProductInput>) -> HandlerResult {
  let input = input.into_inner();
  let product = state.with_conn(move |conn| catalog::create_product(conn, &input)).await?;
  Ok(HttpResponse::Created().json(product))
}

#[get("/api/products/{id}")]
pub async fn get_product(state: Data<AppState>, path: Path<String>) -> HandlerResult {
  let id = path.into_inner();
  let product = state.with_conn(move |conn| catalog::get_product(conn, &id)).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[put("/api/products/{id}")]
pub async fn update_product(_admin: AdminSession, state: Data<AppState>, path: Path<String>, input: Json<catalog::ProductInput>) -> HandlerResult {
  let (id, input) = (path.into_inner(), input.into_inner());
  let product = state.with_conn(move |conn| catalog::update_product(conn, &id, &input)).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[delete("/api/products/{id}")]
pub async fn delete_product(_admin: AdminSession, state: Data<AppState>, path: Path<String>) -> HandlerResult {
  let id = path.into_inner();
  state.with_conn(move |conn| catalog::delete_product(conn, &id)).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Product has been deleted!" })))
}

// Regions and neighborhoods

#[get("/api/regions")]
pub async fn list_regions(state: Data<AppState>) -> HandlerResult {
  let rows = state.with_conn(regions::list_regions).await?;
  Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/regions")]
pub async fn create_region(_admin: AdminSession, state: Data<AppState>, input: Json<regions::RegionInput>) -> HandlerResult {
  let input = input.into_inner();
  let region = state.with_conn(move |conn| regions::create_region(conn, &input)).await?;
  Ok(HttpResponse::Created().json(region))
}

#[get("/api/regions/{id}")]
pub async fn get_region(state: Data<AppState>, path: Path<u64>) -> HandlerResult {
  let id = path.into_inner();
  let detail = state.with_conn(move |conn| regions::get_region_detail(conn, id)).await?;
  Ok(HttpResponse::Ok().json(detail))
}

#[put("/api/regions/{id}")]
pub async fn update_region(_admin: AdminSession, state: Data<AppState>, path: Path<u64>, input: Json<regions::RegionInput>) -> HandlerResult {
  let (id, input) = (path.into_inner(), input.into_inner());
  let region = state.with_conn(move |conn| regions::update_region(conn, id, &input)).await?;
  Ok(HttpResponse::Ok().json(region))
}

#[delete("/api/regions/{id}")]
pub async fn delete_region(_admin: AdminSession, state: Data<AppState>, path: Path<u64>) -> HandlerResult {
  let id = path.into_inner();
  state.with_conn(move |conn| regions::delete_region(conn, id)).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Region deleted successfully" })))
}

#[get("/api/neighborhoods")]
pub async fn list_neighborhoods(state: Data<AppState>, params: Query<InputOptions>) -> HandlerResult {
  let region_id = params.region_id.ok_or(AppError::BadRequest("Region ID is required".to_string()))?;
  let rows = state.with_conn(move |conn| regions::list_neighborhoods(conn, region_id)).await?;
  Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/neighborhoods")]
pub async fn create_neighborhood(_admin: AdminSession, state: Data<AppState>, input: Json<regions::NeighborhoodInput>) -> HandlerResult {
  let input = input.into_inner();
  let neighborhood = state.with_conn(move |conn| regions::create_neighborhood(conn, &input)).await?;
  Ok(HttpResponse::Created().json(neighborhood))
}

#[get("/api/neighborhoods/{id}")]
pub async fn get_neighborhood(state: Data<AppState>, path: Path<u64>) -> HandlerResult {
  let id = path.into_inner();
  let neighborhood = state.with_conn(move |conn| regions::get_neighborhood(conn, id)).await?;
  Ok(HttpResponse::Ok().json(neighborhood))
}

#[put("/api/neighborhoods/{id}")]
pub async fn update_neighborhood(_admin: AdminSession, state: Data<AppState>, path: Path<u64>, input: Json<regions::NeighborhoodInput>) -> HandlerResult {
  let (id, input) = (path.into_inner(), input.into_inner());
  let neighborhood = state.with_conn(move |conn| regions::update_neighborhood(conn, id, &input)).await?;
  Ok(HttpResponse::Ok().json(neighborhood))
}

#[delete("/api/neighborhoods/{id}")]
pub async fn delete_neighborhood(_admin: AdminSession, state: Data<AppState>, path: Path<u64>) -> HandlerResult {
  let id = path.into_inner();
  state.with_conn(move |conn| regions::delete_neighborhood(conn, id)).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Neighborhood deleted successfully." })))
}

// Addresses

#[get("/api/address")]
pub async fn list_addresses(session: Session, state: Data<AppState>) -> HandlerResult {
  let rows = state.with_conn(move |conn| addresses::list_addresses(conn, &session.user_id)).await?;
  Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/address")]
pub async fn create_address(session: Session, state: Data<AppState>, input: Json<addresses::AddressInput>) -> HandlerResult {
  let input = input.into_inner();
  let address = state.with_conn(move |conn| {
    users::ensure_user(conn, &session)?;
    addresses::create_address(conn, &session.user_id, &input)
  }).await?;
  Ok(HttpResponse::Created().json(address))
}

#[put("/api/address")]
pub async fn update_address(session: Session, state: Data<AppState>, input: Json<addresses::AddressInput>) -> HandlerResult {
  let input = input.into_inner();
  let count = state.with_conn(move |conn| addresses::update_user_addresses(conn, &session.user_id, &input)).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Address updated successfully", "count": count })))
}

#[get("/api/address/{user_id}")]
pub async fn get_address_detail(session: Session, state: Data<AppState>, path: Path<String>) -> HandlerResult {
  let user_id = path.into_inner();
  session.require_owner_or_admin(&user_id)?;
  let detail = state.with_conn(move |conn| addresses::find_address_detail(conn, &user_id)).await?;
  match detail {
    Some(detail) => Ok(HttpResponse::Ok().json(detail)),
    None => Err(AppError::NotFound("Address, region, or neighborhood")),
  }
}

// Orders

#[get("/api/orders")]
pub async fn list_orders(session: Session, state: Data<AppState>) -> HandlerResult {
  let rows = state.with_conn(move |conn| orders::list_orders(conn, &session)).await?;
  Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/orders")]
pub async fn create_order(session: Session, state: Data<AppState>, req: Json<CheckoutRequest>) -> HandlerResult {
  let req = req.into_inner();
  req.validate()?;
  let phone = state.whatsapp_phone.clone();
  let today = current_date();
  let placed = state.with_conn(move |conn| orders::place_order(conn, &session, &req, today, &phone)).await?;
  Ok(HttpResponse::Created().json(placed))
}

#[post("/api/orders/deliveries/today")]
pub async fn deliver_today(_admin: AdminSession, state: Data<AppState>) -> HandlerResult {
  let today = current_date();
  let count = state.with_conn(move |conn| orders::deliver_orders_due(conn, today)).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "count": count, "message": format!("{} orders updated", count) })))
}

#[get("/api/orders/deliveries/today")]
pub async fn delivered_today(_admin: AdminSession, state: Data<AppState>) -> HandlerResult {
  let today = current_date();
  let rows = state.with_conn(move |conn| orders::list_delivered_on(conn, today)).await?;
  if rows.is_empty() {
    return Err(AppError::NotFound("Delivered order for today"));
  }
  Ok(HttpResponse::Ok().json(json!({ "success": true, "orders": rows })))
}

#[get("/api/orders/{id}")]
pub async fn get_order(session: Session, state: Data<AppState>, path: Path<String>) -> HandlerResult {
  let id = path.into_inner();
  let order = state.with_conn(move |conn| orders::get_order(conn, &id)).await?;
  session.require_owner_or_admin(&order.user_id)?;
  Ok(HttpResponse::Ok().json(order))
}

#[put("/api/orders/{id}")]
pub async fn update_order_status(_admin: AdminSession, state: Data<AppState>, path: Path<String>, input: Json<orders::StatusInput>) -> HandlerResult {
  let id = path.into_inner();
  let status = input.to_status()?;
  state.with_conn(move |conn| orders::update_order_status(conn, &id, status)).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Order has been updated!", "status": status })))
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{test, web, App, http::StatusCode};
  use crate::constants::HEADER_USER_ID;

  #[actix_web::test]
  async fn test_welcome_and_not_found() {
    let app = test::init_service(
      App::new()
        .route("/", web::get().to(welcome))
        .default_service(web::to(route_not_found))
    ).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.status().is_success());
    let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere/at/all").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "route not found");
  }

  #[actix_web::test]
  async fn test_delivery_dates_endpoint() {
    let app = test::init_service(App::new().service(delivery_dates)).await;
    let req = test::TestRequest::get().uri("/api/delivery-dates?days=1,3,5&dt=2024-10-23").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["today"], "2024-10-23");
    assert_eq!(body["count"], 4);
    assert_eq!(body["selectable"], 3);
    assert_eq!(body["candidates"][0]["date"], "2024-10-23");
    assert_eq!(body["candidates"][0]["selectable"], false);
    assert_eq!(body["candidates"][3]["date"], "2024-10-30");
    assert_eq!(body["candidates"][3]["isRolloverOfToday"], true);
  }

  #[actix_web::test]
  async fn test_delivery_dates_empty_and_invalid() {
    let app = test::init_service(App::new().service(delivery_dates)).await;
    let req = test::TestRequest::get().uri("/api/delivery-dates?dt=2024-10-20").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);

    let req = test::TestRequest::get().uri("/api/delivery-dates?days=8&dt=2024-10-20").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["valid"], false);
  }

  #[actix_web::test]
  async fn test_cart_summary() {
    let app = test::init_service(App::new().service(cart_summary)).await;
    let req = test::TestRequest::post()
      .uri("/api/cart/summary")
      .set_json(json!([
        { "productId": "a", "title": "Bal", "price": "45.00", "quantity": 2 },
        { "productId": "b", "price": "10.25", "quantity": 1 },
        { "productId": "a", "price": "45.00", "quantity": 1 }
      ]))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalItems"], 4);
    assert_eq!(body["totalPrice"], "145.25");
    assert_eq!(body["items"].as_array().map(|a| a.len()), Some(2));

    let req = test::TestRequest::post()
      .uri("/api/cart/summary")
      .set_json(json!([
        { "productId": "a", "price": "1", "quantity": u32::MAX },
        { "productId": "a", "price": "1", "quantity": 1 }
      ]))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[actix_web::test]
  async fn test_session_required_before_database() {
    let app = test::init_service(App::new().service(list_orders).service(create_region)).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/orders").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let req = test::TestRequest::post()
      .uri("/api/regions")
      .insert_header((HEADER_USER_ID, "user_1"))
      .set_json(json!({ "name": "Kadıköy" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }
}
