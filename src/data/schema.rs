use mysql::prelude::*;
use mysql::PooledConn;
use tracing::info;

/*
* Minimal tables for a fresh database. Existing tables are left untouched.
* Dates are kept as ISO strings, timestamps as unix seconds.
*/
pub const SCHEMA_STATEMENTS: [&'static str; 8] = [
  "CREATE TABLE IF NOT EXISTS users (
    id VARCHAR(64) NOT NULL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    phone_number VARCHAR(64) NOT NULL
  )",
  "CREATE TABLE IF NOT EXISTS categories (
    id VARCHAR(36) NOT NULL PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    `desc` TEXT NOT NULL,
    img VARCHAR(512) NOT NULL,
    slug VARCHAR(255) NOT NULL UNIQUE
  )",
  "CREATE TABLE IF NOT EXISTS products (
    id VARCHAR(36) NOT NULL PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    `desc` TEXT NOT NULL,
    img VARCHAR(512) NULL,
    price DECIMAL(10,2) NOT NULL,
    cat_slug VARCHAR(255) NOT NULL,
    is_featured TINYINT(1) NOT NULL DEFAULT 0,
    created_at BIGINT NOT NULL
  )",
  "CREATE TABLE IF NOT EXISTS regions (
    id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL
  )",
  "CREATE TABLE IF NOT EXISTS neighborhoods (
    id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    region_id INT UNSIGNED NOT NULL,
    name VARCHAR(255) NOT NULL,
    delivery_days TEXT NOT NULL,
    start_time VARCHAR(5) NOT NULL,
    end_time VARCHAR(5) NOT NULL,
    UNIQUE KEY region_name (region_id, name)
  )",
  "CREATE TABLE IF NOT EXISTS addresses (
    id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    user_id VARCHAR(64) NOT NULL,
    city VARCHAR(255) NOT NULL,
    line TEXT NOT NULL,
    region_id INT UNSIGNED NOT NULL,
    neighborhood_id INT UNSIGNED NULL,
    is_region_available TINYINT(1) NOT NULL DEFAULT 1,
    KEY user_idx (user_id)
  )",
  "CREATE TABLE IF NOT EXISTS orders (
    id VARCHAR(36) NOT NULL PRIMARY KEY,
    user_id VARCHAR(64) NOT NULL,
    price DECIMAL(10,2) NOT NULL,
    status VARCHAR(32) NOT NULL,
    region_id INT UNSIGNED NOT NULL,
    address_id INT UNSIGNED NOT NULL,
    delivery_date VARCHAR(10) NOT NULL,
    recipient_name VARCHAR(255) NOT NULL,
    recipient_phone VARCHAR(64) NOT NULL,
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL,
    KEY user_idx (user_id),
    KEY delivery_idx (delivery_date, status)
  )",
  "CREATE TABLE IF NOT EXISTS order_items (
    id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    order_id VARCHAR(36) NOT NULL,
    product_id VARCHAR(36) NOT NULL,
    title VARCHAR(255) NOT NULL,
    `desc` TEXT NOT NULL,
    img VARCHAR(512) NULL,
    quantity INT UNSIGNED NOT NULL,
    price DECIMAL(10,2) NOT NULL,
    start_time VARCHAR(5) NULL,
    end_time VARCHAR(5) NULL,
    address TEXT NULL,
    region_name VARCHAR(255) NULL,
    neighborhood VARCHAR(255) NULL,
    KEY order_idx (order_id)
  )",
];

pub fn init_schema(conn: &mut PooledConn) -> mysql::Result<()> {
  for statement in SCHEMA_STATEMENTS {
    conn.query_drop(statement)?;
  }
  info!("Schema ready ({} tables)", SCHEMA_STATEMENTS.len());
  Ok(())
}
