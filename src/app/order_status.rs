use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Serialize, Deserialize};

/// Order lifecycle steps as shown on the tracking bar.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum OrderStatus {
  #[serde(rename = "Alındı")]
  Received = 0,
  #[serde(rename = "hazırlanıyor")]
  Preparing = 1,
  #[serde(rename = "Yolda")]
  OnTheWay = 2,
  #[serde(rename = "teslim edildi")]
  Delivered = 3,
}

pub const ORDER_STATUS_STEPS: usize = 4;

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Received => "Alındı",
      OrderStatus::Preparing => "hazırlanıyor",
      OrderStatus::OnTheWay => "Yolda",
      OrderStatus::Delivered => "teslim edildi",
    }
  }

  pub fn parse(value: &str) -> Option<OrderStatus> {
    let key = value.trim();
    (0..ORDER_STATUS_STEPS)
      .filter_map(OrderStatus::from_usize)
      .find(|status| status.as_str() == key || status.as_str().to_lowercase() == key.to_lowercase())
  }

  pub fn step(&self) -> usize {
    self.to_usize().unwrap_or(0)
  }

  pub fn progress_percent(&self) -> u8 {
    (((self.step() + 1) * 100) / ORDER_STATUS_STEPS) as u8
  }
}

impl Default for OrderStatus {
  fn default() -> Self {
    OrderStatus::Received
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse() {
    assert_eq!(OrderStatus::parse("Alındı"), Some(OrderStatus::Received));
    assert_eq!(OrderStatus::parse(" Yolda "), Some(OrderStatus::OnTheWay));
    assert_eq!(OrderStatus::parse("yolda"), Some(OrderStatus::OnTheWay));
    assert_eq!(OrderStatus::parse("teslim edildi"), Some(OrderStatus::Delivered));
    assert_eq!(OrderStatus::parse("shipped"), None);
  }

  #[test]
  fn test_steps() {
    assert_eq!(OrderStatus::Received.progress_percent(), 25);
    assert_eq!(OrderStatus::OnTheWay.progress_percent(), 75);
    assert_eq!(OrderStatus::Delivered.progress_percent(), 100);
    assert!(OrderStatus::Preparing < OrderStatus::Delivered);
    assert_eq!(OrderStatus::Delivered.step(), ORDER_STATUS_STEPS - 1);
  }

  #[test]
  fn test_serde_uses_display_names() {
    assert_eq!(serde_json::to_string(&OrderStatus::Preparing).unwrap(), "\"hazırlanıyor\"");
    let status: OrderStatus = serde_json::from_str("\"teslim edildi\"").unwrap();
    assert_eq!(status, OrderStatus::Delivered);
  }
}
