use chrono::NaiveDate;
use mysql::prelude::*;
use mysql::{params, PooledConn, TxOpts};
use rust_decimal::Decimal;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use super::addresses::find_address_detail;
use super::catalog::get_products_by_ids;
use super::{new_id, parse_price};
use crate::app::checkout::{price_items, require_selectable_delivery_date, CheckoutRequest};
use crate::app::order_message::OrderRelay;
use crate::app::order_status::OrderStatus;
use crate::app::session::Session;
use crate::error::AppError;
use crate::lib::date_conv::{current_timestamp, delivery_day_label, iso_string_to_date, unixtime_to_local_datetime};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub order_id: String,
  pub product_id: String,
  pub title: String,
  pub desc: String,
  pub img: Option<String>,
  pub quantity: u32,
  pub price: Decimal,
  pub start_time: Option<String>,
  pub end_time: Option<String>,
  pub address: Option<String>,
  pub region_name: Option<String>,
  pub neighborhood: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: String,
  pub user_id: String,
  pub price: Decimal,
  pub status: OrderStatus,
  pub progress_percent: u8,
  pub region_id: u64,
  pub address_id: u64,
  pub delivery_date: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub delivery_day: Option<String>,
  pub recipient_name: String,
  pub recipient_phone: String,
  pub created_at: i64,
  pub updated_at: i64,
  pub items: Vec<OrderItem>,
}

type OrderRow = (String, String, String, String, u64, u64, String, String, String, i64, i64);
type OrderItemRow = (String, String, String, String, Option<String>, u32, String, Option<String>, Option<String>, Option<String>, Option<String>, Option<String>);

const ORDER_COLUMNS: &'static str = "id, user_id, price, status, region_id, address_id, delivery_date, recipient_name, recipient_phone, created_at, updated_at";
const ORDER_ITEM_COLUMNS: &'static str = "order_id, product_id, title, `desc`, img, quantity, price, start_time, end_time, address, region_name, neighborhood";

impl Order {
  fn from_row(row: OrderRow) -> Result<Order, AppError> {
    let (id, user_id, price, status, region_id, address_id, delivery_date, recipient_name, recipient_phone, created_at, updated_at) = row;
    let status = match OrderStatus::parse(&status) {
      Some(status) => status,
      None => {
        warn!("Order {} has unknown status {}", id, status);
        OrderStatus::default()
      }
    };
    let delivery_day = iso_string_to_date(&delivery_date).map(|date| delivery_day_label(&date));
    Ok(Order {
      price: parse_price(&price)?,
      progress_percent: status.progress_percent(),
      status,
      id,
      user_id,
      region_id,
      address_id,
      delivery_date,
      delivery_day,
      recipient_name,
      recipient_phone,
      created_at,
      updated_at,
      items: vec![],
    })
  }
}

impl OrderItem {
  fn from_row(row: OrderItemRow) -> Result<OrderItem, AppError> {
    let (order_id, product_id, title, desc, img, quantity, price, start_time, end_time, address, region_name, neighborhood) = row;
    Ok(OrderItem {
      order_id,
      product_id,
      title,
      desc,
      img,
      quantity,
      price: parse_price(&price)?,
      start_time,
      end_time,
      address,
      region_name,
      neighborhood,
    })
  }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
  pub order_id: String,
  pub total: Decimal,
  pub delivery_date: NaiveDate,
  pub whatsapp_url: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StatusInput {
  pub status: Option<String>,
}

impl StatusInput {
  pub fn to_status(&self) -> Result<OrderStatus, AppError> {
    let raw = self.status.as_deref().ok_or(AppError::MissingField("status"))?;
    OrderStatus::parse(raw).ok_or_else(|| AppError::BadRequest(format!("Unknown order status {}", raw)))
  }
}

/**
 * Records a checkout for the session user. The delivery date must be one of the
 * selectable dates computed for `today` from the neighborhood of the user's address,
 * and prices come from the catalog. Returns the new order id with its relay link.
 */
pub fn place_order(conn: &mut PooledConn, session: &Session, req: &CheckoutRequest, today: NaiveDate, company_phone: &str) -> Result<PlacedOrder, AppError> {
  let delivery_date = req.validate()?;
  let detail = find_address_detail(conn, &session.user_id)?
    .ok_or_else(|| AppError::BadRequest("Address, region, or neighborhood not found".to_string()))?;
  let schedule = detail.neighborhood.schedule()?;
  require_selectable_delivery_date(today, &schedule, delivery_date)?;
  let products = get_products_by_ids(conn, &req.product_ids())?;
  let cart = price_items(&req.items, &products)?;

  let order_id = new_id();
  let now = current_timestamp();
  let recipient_name = req.recipient_name.trim();
  let recipient_phone = req.recipient_phone.trim();
  let mut tx = conn.start_transaction(TxOpts::default())?;
  tx.exec_drop(
    "INSERT INTO orders (id, user_id, price, status, region_id, address_id, delivery_date, recipient_name, recipient_phone, created_at, updated_at)
    VALUES (:id, :user_id, :price, :status, :region_id, :address_id, :delivery_date, :recipient_name, :recipient_phone, :created_at, :updated_at)",
    params! {
      "id" => order_id.as_str(),
      "user_id" => session.user_id.as_str(),
      "price" => cart.total_price.to_string(),
      "status" => OrderStatus::Received.as_str(),
      "region_id" => detail.region.id,
      "address_id" => detail.address.id,
      "delivery_date" => delivery_date.format("%Y-%m-%d").to_string(),
      "recipient_name" => recipient_name,
      "recipient_phone" => recipient_phone,
      "created_at" => now,
      "updated_at" => now,
    },
  )?;
  tx.exec_batch(
    "INSERT INTO order_items (order_id, product_id, title, `desc`, img, quantity, price, start_time, end_time, address, region_name, neighborhood)
    VALUES (:order_id, :product_id, :title, :desc, :img, :quantity, :price, :start_time, :end_time, :address, :region_name, :neighborhood)",
    cart.items.iter().map(|line| {
      let product = products.iter().find(|p| p.id == line.product_id);
      params! {
        "order_id" => order_id.as_str(),
        "product_id" => line.product_id.as_str(),
        "title" => line.title.as_str(),
        "desc" => product.map(|p| p.desc.as_str()).unwrap_or(""),
        "img" => product.and_then(|p| p.img.as_deref()),
        "quantity" => line.quantity,
        "price" => line.price.to_string(),
        "start_time" => detail.neighborhood.start_time.as_str(),
        "end_time" => detail.neighborhood.end_time.as_str(),
        "address" => detail.full_address.as_str(),
        "region_name" => detail.region.name.as_str(),
        "neighborhood" => detail.neighborhood.name.as_str(),
      }
    }),
  )?;
  tx.commit()?;
  info!("Order {} placed by {} for {} ({} items)", order_id, session.user_id, delivery_date, cart.total_items);

  let relay = OrderRelay {
    order_id: &order_id,
    ordered_at: unixtime_to_local_datetime(now),
    delivery_date,
    region_name: Some(&detail.region.name),
    neighborhood: Some(&detail.neighborhood.name),
    start_time: Some(&detail.neighborhood.start_time),
    end_time: Some(&detail.neighborhood.end_time),
    recipient_name,
    recipient_phone,
    address: Some(&detail.full_address),
    items: &cart.items,
    total: cart.total_price,
  };
  let whatsapp_url = relay.whatsapp_url(company_phone);
  Ok(PlacedOrder { order_id, total: cart.total_price, delivery_date, whatsapp_url })
}

fn load_items(conn: &mut PooledConn, order: &mut Order) -> Result<(), AppError> {
  let sql = format!("SELECT {} FROM order_items WHERE order_id = :order_id ORDER BY id", ORDER_ITEM_COLUMNS);
  let rows: Vec<OrderItemRow> = conn.exec(sql, params! { "order_id" => order.id.as_str() })?;
  order.items = rows.into_iter().map(OrderItem::from_row).collect::<Result<Vec<_>, _>>()?;
  Ok(())
}

fn with_items(conn: &mut PooledConn, rows: Vec<OrderRow>) -> Result<Vec<Order>, AppError> {
  let mut orders: Vec<Order> = Vec::with_capacity(rows.len());
  for row in rows {
    let mut order = Order::from_row(row)?;
    load_items(conn, &mut order)?;
    orders.push(order);
  }
  Ok(orders)
}

/// Admins see every order, customers only their own.
pub fn list_orders(conn: &mut PooledConn, session: &Session) -> Result<Vec<Order>, AppError> {
  let rows: Vec<OrderRow> = if session.is_admin() {
    conn.query(format!("SELECT {} FROM orders ORDER BY created_at DESC", ORDER_COLUMNS))?
  } else {
    conn.exec(
      format!("SELECT {} FROM orders WHERE user_id = :user_id ORDER BY created_at DESC", ORDER_COLUMNS),
      params! { "user_id" => session.user_id.as_str() },
    )?
  };
  with_items(conn, rows)
}

pub fn get_order(conn: &mut PooledConn, id: &str) -> Result<Order, AppError> {
  let sql = format!("SELECT {} FROM orders WHERE id = :id", ORDER_COLUMNS);
  let row: Option<OrderRow> = conn.exec_first(sql, params! { "id" => id })?;
  let mut order = match row {
    Some(row) => Order::from_row(row)?,
    None => return Err(AppError::NotFound("Order")),
  };
  load_items(conn, &mut order)?;
  Ok(order)
}

pub fn update_order_status(conn: &mut PooledConn, id: &str, status: OrderStatus) -> Result<(), AppError> {
  conn.exec_drop(
    "UPDATE orders SET status = :status, updated_at = :updated_at WHERE id = :id",
    params! { "id" => id, "status" => status.as_str(), "updated_at" => current_timestamp() },
  )?;
  if conn.affected_rows() < 1 {
    // unchanged rows also report 0, so tell them apart
    get_order(conn, id)?;
  }
  info!("Order {} is now {}", id, status.as_str());
  Ok(())
}

fn legacy_date_pattern(date: &NaiveDate) -> String {
  format!("% - {}", date.format("%Y-%m-%d"))
}

/// Marks received orders due on `date` as delivered, returning how many changed.
pub fn deliver_orders_due(conn: &mut PooledConn, date: NaiveDate) -> Result<u64, AppError> {
  conn.exec_drop(
    "UPDATE orders SET status = :delivered, updated_at = :updated_at
    WHERE (delivery_date = :date OR delivery_date LIKE :legacy) AND status = :received",
    params! {
      "delivered" => OrderStatus::Delivered.as_str(),
      "received" => OrderStatus::Received.as_str(),
      "date" => date.format("%Y-%m-%d").to_string(),
      "legacy" => legacy_date_pattern(&date),
      "updated_at" => current_timestamp(),
    },
  )?;
  let count = conn.affected_rows();
  info!("{} orders due {} marked delivered", count, date);
  Ok(count)
}

pub fn list_delivered_on(conn: &mut PooledConn, date: NaiveDate) -> Result<Vec<Order>, AppError> {
  let rows: Vec<OrderRow> = conn.exec(
    format!("SELECT {} FROM orders WHERE (delivery_date = :date OR delivery_date LIKE :legacy) AND status = :delivered ORDER BY created_at", ORDER_COLUMNS),
    params! {
      "date" => date.format("%Y-%m-%d").to_string(),
      "legacy" => legacy_date_pattern(&date),
      "delivered" => OrderStatus::Delivered.as_str(),
    },
  )?;
  with_items(conn, rows)
}
