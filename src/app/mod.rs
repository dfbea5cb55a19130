pub mod cart;
pub mod checkout;
pub mod delivery_dates;
pub mod order_message;
pub mod order_status;
pub mod session;
pub mod weekday_code;
