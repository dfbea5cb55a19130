use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

use super::cart::{Cart, CartLine};
use super::delivery_dates::is_selectable_delivery_date;
use super::weekday_code::WeekdayIndex;
use crate::error::AppError;
use crate::lib::date_conv::iso_string_to_date;
use crate::services::catalog::Product;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
  pub product_id: String,
  pub quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
  pub delivery_date: String,
  pub recipient_name: String,
  pub recipient_phone: String,
  pub items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
  /// Field checks that need no stored data. Returns the parsed delivery date.
  pub fn validate(&self) -> Result<NaiveDate, AppError> {
    if self.items.is_empty() {
      return Err(AppError::BadRequest("The cart is empty".to_string()));
    }
    if self.items.iter().any(|item| item.quantity < 1) {
      return Err(AppError::BadRequest("Quantities must be at least 1".to_string()));
    }
    if self.recipient_name.trim().is_empty() {
      return Err(AppError::MissingField("recipientName"));
    }
    if self.recipient_phone.trim().is_empty() {
      return Err(AppError::MissingField("recipientPhone"));
    }
    iso_string_to_date(&self.delivery_date)
      .ok_or_else(|| AppError::BadRequest(format!("Invalid delivery date {}", self.delivery_date)))
  }

  pub fn product_ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self.items.iter().map(|item| item.product_id.clone()).collect();
    ids.sort();
    ids.dedup();
    ids
  }
}

pub fn require_selectable_delivery_date(today: NaiveDate, days: &[WeekdayIndex], chosen: NaiveDate) -> Result<(), AppError> {
  if is_selectable_delivery_date(today, days, &chosen) {
    Ok(())
  } else {
    Err(AppError::DeliveryDateUnavailable(chosen))
  }
}

/// Prices the requested items from catalog rows; client prices are never trusted.
pub fn price_items(items: &[CheckoutItem], products: &[Product]) -> Result<Cart, AppError> {
  let mut cart = Cart::new();
  for item in items {
    let product = products
      .iter()
      .find(|p| p.id == item.product_id)
      .ok_or(AppError::NotFound("Product"))?;
    cart.add(CartLine {
      product_id: product.id.clone(),
      title: product.title.clone(),
      price: product.price,
      quantity: item.quantity,
    })?;
  }
  Ok(cart)
}
