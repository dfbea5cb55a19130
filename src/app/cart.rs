use rust_decimal::Decimal;
use serde::{Serialize, Deserialize};

use crate::error::AppError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub product_id: String,
  #[serde(default)]
  pub title: String,
  pub price: Decimal,
  pub quantity: u32,
}

impl CartLine {
  /// None when the line total does not fit in a `Decimal`.
  pub fn subtotal(&self) -> Option<Decimal> {
    self.price.checked_mul(Decimal::from(self.quantity))
  }
}

/// Shopping cart passed explicitly between checkout steps.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
  pub items: Vec<CartLine>,
  pub total_items: u32,
  pub total_price: Decimal,
}

fn too_large() -> AppError {
  AppError::BadRequest("Cart quantity or total is too large".to_string())
}

fn totals(items: &[CartLine]) -> Result<(u32, Decimal), AppError> {
  let mut total_items: u32 = 0;
  let mut total_price = Decimal::ZERO;
  for item in items {
    total_items = total_items.checked_add(item.quantity).ok_or_else(too_large)?;
    let subtotal = item.subtotal().ok_or_else(too_large)?;
    total_price = total_price.checked_add(subtotal).ok_or_else(too_large)?;
  }
  Ok((total_items, total_price))
}

impl Cart {
  pub fn new() -> Self {
    Cart::default()
  }

  pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, AppError> {
    let mut cart = Cart::new();
    for line in lines {
      cart.add(line)?;
    }
    Ok(cart)
  }

  /*
  * Adds a line, merging quantities when the product is already present.
  * The cart is left unchanged when a quantity or total would overflow.
  */
  pub fn add(&mut self, line: CartLine) -> Result<(), AppError> {
    if line.quantity < 1 {
      return Ok(());
    }
    let mut items = self.items.clone();
    match items.iter_mut().find(|item| item.product_id == line.product_id) {
      Some(item) => {
        item.quantity = item.quantity.checked_add(line.quantity).ok_or_else(too_large)?;
        item.price = line.price;
        if line.title.len() > 0 {
          item.title = line.title;
        }
      },
      None => items.push(line),
    }
    let (total_items, total_price) = totals(&items)?;
    self.items = items;
    self.total_items = total_items;
    self.total_price = total_price;
    Ok(())
  }
}
