use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::cart::CartLine;
use crate::constants::UNSPECIFIED;
use crate::lib::date_conv::{delivery_day_label, format_datetime_tr};

/// Everything the shop needs to fulfil an order, relayed as a chat message.
#[derive(Debug, Clone)]
pub struct OrderRelay<'a> {
  pub order_id: &'a str,
  pub ordered_at: NaiveDateTime,
  pub delivery_date: NaiveDate,
  pub region_name: Option<&'a str>,
  pub neighborhood: Option<&'a str>,
  pub start_time: Option<&'a str>,
  pub end_time: Option<&'a str>,
  pub recipient_name: &'a str,
  pub recipient_phone: &'a str,
  pub address: Option<&'a str>,
  pub items: &'a [CartLine],
  pub total: Decimal,
}

fn or_unspecified(value: Option<&str>) -> &str {
  match value {
    Some(v) if v.trim().len() > 0 => v,
    _ => UNSPECIFIED,
  }
}

/*
* Last four digits found in the order id, e.g. "#4821"
*/
pub fn short_order_number(order_id: &str) -> String {
  let digits: Vec<char> = order_id.chars().filter(|c| c.is_ascii_digit()).collect();
  let start = digits.len().saturating_sub(4);
  digits[start..].iter().collect()
}

impl<'a> OrderRelay<'a> {
  pub fn message(&self) -> String {
    let order_lines = self.items
      .iter()
      .enumerate()
      .map(|(index, item)| format!(
        "*{}.*  _Ürün:_ *{}*\n    _Adet:_ *{}*\n    _Fiyat:_ *{:.2} TL*",
        index + 1, item.title, item.quantity, item.price
      ))
      .collect::<Vec<String>>()
      .join("\n\n");
    let mut lines: Vec<String> = vec![];
    lines.push("✅ *Yeni Sipariş Alındı!*".to_string());
    lines.push(format!("#️⃣ *Sipariş Numarası:* *#{}*", short_order_number(self.order_id)));
    lines.push(String::new());
    lines.push("🛒 *Sipariş Bilgileri:*".to_string());
    lines.push("-------------------------".to_string());
    lines.push("📅 *Sipariş Tarihi:*".to_string());
    lines.push(format!(" {}", format_datetime_tr(&self.ordered_at)));
    lines.push(String::new());
    lines.push(format!("📍 *Bölge:* {} - {}", or_unspecified(self.region_name), or_unspecified(self.neighborhood)));
    lines.push(String::new());
    lines.push(format!("⏰ *Zaman:*  {} - {}", or_unspecified(self.start_time), or_unspecified(self.end_time)));
    lines.push(String::new());
    lines.push(format!("👤 *Alıcı:* {}", self.recipient_name));
    lines.push(format!("📞 *Telefon:* {}", self.recipient_phone));
    lines.push(String::new());
    lines.push("🗓️ *Teslimat Günü:*".to_string());
    lines.push(format!(" {}", delivery_day_label(&self.delivery_date)));
    lines.push(String::new());
    lines.push("🏠 *Adres:* ".to_string());
    lines.push(or_unspecified(self.address).to_string());
    lines.push(String::new());
    lines.push("🛍️ *Sipariş Detayları:*".to_string());
    lines.push("-------------------------".to_string());
    lines.push(order_lines);
    lines.push(String::new());
    lines.push("💰 *Toplam Fiyat:*".to_string());
    lines.push(format!(" *{:.2} TL*", self.total));
    lines.join("\n")
  }

  pub fn whatsapp_url(&self, company_phone: &str) -> String {
    whatsapp_url(company_phone, &self.message())
  }
}

pub fn whatsapp_url(company_phone: &str, message: &str) -> String {
  format!("whatsapp://send?phone={}&text={}", company_phone, urlencoding::encode(message))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  fn items() -> Vec<CartLine> {
    vec![
      CartLine { product_id: "p1".to_string(), title: "Beyaz Peynir".to_string(), price: Decimal::from_str("120.5").unwrap(), quantity: 2 },
      CartLine { product_id: "p2".to_string(), title: "Köy Yumurtası".to_string(), price: Decimal::from_str("60").unwrap(), quantity: 1 },
    ]
  }

  fn relay<'a>(items: &'a [CartLine]) -> OrderRelay<'a> {
    OrderRelay {
      order_id: "3f2a9c81-77b0-4e1d-9a42-0c5d1e6b4821",
      ordered_at: NaiveDate::from_ymd_opt(2024, 10, 23).unwrap().and_hms_opt(14, 5, 0).unwrap(),
      delivery_date: NaiveDate::from_ymd_opt(2024, 10, 25).unwrap(),
      region_name: Some("Kadıköy"),
      neighborhood: Some("Moda"),
      start_time: Some("09:00"),
      end_time: None,
      recipient_name: "Ali Veli",
      recipient_phone: "05551234567",
      address: Some("İstanbul, Moda Cd. 12"),
      items,
      total: Decimal::from_str("301").unwrap(),
    }
  }

  #[test]
  fn test_short_order_number() {
    assert_eq!(short_order_number("3f2a9c81-77b0-4e1d-9a42-0c5d1e6b4821"), "4821");
    assert_eq!(short_order_number("ab1c2"), "12");
    assert_eq!(short_order_number("abc"), "");
  }

  #[test]
  fn test_message_content() {
    let items = items();
    let message = relay(&items).message();
    assert!(message.contains("*#4821*"));
    assert!(message.contains("23 Ekim 2024, 14:05"));
    assert!(message.contains("📍 *Bölge:* Kadıköy - Moda"));
    assert!(message.contains("⏰ *Zaman:*  09:00 - Belirtilmemiş"));
    assert!(message.contains(" Cuma - 25 Ekim 2024"));
    assert!(message.contains("*1.*  _Ürün:_ *Beyaz Peynir*\n    _Adet:_ *2*\n    _Fiyat:_ *120.50 TL*"));
    assert!(message.contains("*2.*  _Ürün:_ *Köy Yumurtası*"));
    assert!(message.ends_with(" *301.00 TL*"));
  }

  #[test]
  fn test_whatsapp_url_is_encoded() {
    let url = whatsapp_url("905348228865", "Yeni sipariş #12\nToplam: 5 TL");
    assert_eq!(url, "whatsapp://send?phone=905348228865&text=Yeni%20sipari%C5%9F%20%2312%0AToplam%3A%205%20TL");
  }
}
