use mysql::prelude::*;
use mysql::{params, PooledConn};
use rust_decimal::Decimal;
use serde::{Serialize, Deserialize};
use tracing::info;

use super::{new_id, parse_price, require_text};
use crate::error::AppError;
use crate::lib::date_conv::current_timestamp;
use crate::lib::slug::slugify;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
  pub id: String,
  pub title: String,
  pub desc: String,
  pub img: String,
  pub slug: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: String,
  pub title: String,
  pub desc: String,
  pub img: Option<String>,
  pub price: Decimal,
  pub cat_slug: String,
  pub is_featured: bool,
}

type ProductRow = (String, String, String, Option<String>, String, String, bool);

impl Product {
  fn from_row(row: ProductRow) -> Result<Product, AppError> {
    let (id, title, desc, img, price, cat_slug, is_featured) = row;
    Ok(Product { id, title, desc, img, price: parse_price(&price)?, cat_slug, is_featured })
  }
}

const CATEGORY_COLUMNS: &'static str = "id, title, `desc`, img, slug";
const PRODUCT_COLUMNS: &'static str = "id, title, `desc`, img, price, cat_slug, is_featured";

// price column is DECIMAL(10,2)
fn max_price() -> Decimal {
  Decimal::new(100_000_000, 0)
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CategoryInput {
  pub title: Option<String>,
  pub desc: Option<String>,
  pub img: Option<String>,
  pub slug: Option<String>,
}

impl CategoryInput {
  /// Required fields present, slug derived from the title when left blank.
  pub fn to_category(&self, id: String) -> Result<Category, AppError> {
    let title = require_text(&self.title, "title")?;
    let desc = require_text(&self.desc, "desc")?;
    let img = require_text(&self.img, "img")?;
    let slug_source = match &self.slug {
      Some(slug) if slug.trim().len() > 0 => slug.clone(),
      _ => title.clone(),
    };
    let slug = slugify(&slug_source);
    if slug.is_empty() {
      return Err(AppError::BadRequest(format!("Cannot derive a slug from {}", slug_source)));
    }
    Ok(Category { id, title, desc, img, slug })
  }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
  pub title: Option<String>,
  pub desc: Option<String>,
  pub img: Option<String>,
  pub price: Option<Decimal>,
  pub cat_slug: Option<String>,
  pub is_featured: Option<bool>,
}

impl ProductInput {
  pub fn to_product(&self, id: String) -> Result<Product, AppError> {
    let title = require_text(&self.title, "title")?;
    let cat_slug = require_text(&self.cat_slug, "catSlug")?;
    let price = self.price.ok_or(AppError::MissingField("price"))?;
    if price <= Decimal::ZERO {
      return Err(AppError::BadRequest("Price must be positive".to_string()));
    }
    let price = price.round_dp(2);
    if price >= max_price() {
      return Err(AppError::BadRequest(format!("Price must be below {}", max_price())));
    }
    Ok(Product {
      id,
      title,
      desc: self.desc.clone().unwrap_or_default().trim().to_string(),
      img: self.img.clone().filter(|img| img.trim().len() > 0),
      price,
      cat_slug,
      is_featured: self.is_featured.unwrap_or(false),
    })
  }
}

pub fn list_categories(conn: &mut PooledConn) -> Result<Vec<Category>, AppError> {
  let sql = format!("SELECT {} FROM categories ORDER BY title", CATEGORY_COLUMNS);
  let rows = conn.query_map(sql, |(id, title, desc, img, slug)| Category { id, title, desc, img, slug })?;
  Ok(rows)
}

pub fn get_category(conn: &mut PooledConn, id: &str) -> Result<Category, AppError> {
  let sql = format!("SELECT {} FROM categories WHERE id = :id", CATEGORY_COLUMNS);
  let row: Option<(String, String, String, String, String)> = conn.exec_first(sql, params! { "id" => id })?;
  match row {
    Some((id, title, desc, img, slug)) => Ok(Category { id, title, desc, img, slug }),
    None => Err(AppError::NotFound("Category")),
  }
}

fn slug_taken(conn: &mut PooledConn, slug: &str, except_id: &str) -> Result<bool, AppError> {
  let found: Option<String> = conn.exec_first(
    "SELECT id FROM categories WHERE slug = :slug AND id <> :id",
    params! { "slug" => slug, "id" => except_id },
  )?;
  Ok(found.is_some())
}

pub fn create_category(conn: &mut PooledConn, input: &CategoryInput) -> Result<Category, AppError> {
  let category = input.to_category(new_id())?;
  if slug_taken(conn, &category.slug, &category.id)? {
    return Err(AppError::Conflict(format!("Category {} already exists", category.slug)));
  }
  conn.exec_drop(
    "INSERT INTO categories (id, title, `desc`, img, slug) VALUES (:id, :title, :desc, :img, :slug)",
    params! {
      "id" => category.id.as_str(),
      "title" => category.title.as_str(),
      "desc" => category.desc.as_str(),
      "img" => category.img.as_str(),
      "slug" => category.slug.as_str(),
    },
  )?;
  info!("Created category {}", category.slug);
  Ok(category)
}

pub fn update_category(conn: &mut PooledConn, id: &str, input: &CategoryInput) -> Result<Category, AppError> {
  let current = get_category(conn, id)?;
  let merged = CategoryInput {
    title: input.title.clone().or(Some(current.title)),
    desc: input.desc.clone().or(Some(current.desc)),
    img: input.img.clone().or(Some(current.img)),
    slug: input.slug.clone().or(Some(current.slug)),
  };
  let category = merged.to_category(current.id)?;
  if slug_taken(conn, &category.slug, &category.id)? {
    return Err(AppError::Conflict(format!("Category {} already exists", category.slug)));
  }
  conn.exec_drop(
    "UPDATE categories SET title = :title, `desc` = :desc, img = :img, slug = :slug WHERE id = :id",
    params! {
      "id" => category.id.as_str(),
      "title" => category.title.as_str(),
      "desc" => category.desc.as_str(),
      "img" => category.img.as_str(),
      "slug" => category.slug.as_str(),
    },
  )?;
  Ok(category)
}

pub fn delete_category(conn: &mut PooledConn, id: &str) -> Result<(), AppError> {
  conn.exec_drop("DELETE FROM categories WHERE id = :id", params! { "id" => id })?;
  if conn.affected_rows() < 1 {
    return Err(AppError::NotFound("Category"));
  }
  info!("Deleted category {}", id);
  Ok(())
}

pub fn list_products(conn: &mut PooledConn, cat_slug: Option<&str>) -> Result<Vec<Product>, AppError> {
  let rows: Vec<ProductRow> = match cat_slug {
    Some(slug) => conn.exec(
      format!("SELECT {} FROM products WHERE cat_slug = :slug ORDER BY is_featured DESC, title", PRODUCT_COLUMNS),
      params! { "slug" => slug },
    )?,
    None => conn.query(
      format!("SELECT {} FROM products ORDER BY is_featured DESC, title", PRODUCT_COLUMNS),
    )?,
  };
  rows.into_iter().map(Product::from_row).collect()
}

pub fn get_product(conn: &mut PooledConn, id: &str) -> Result<Product, AppError> {
  let sql = format!("SELECT {} FROM products WHERE id = :id", PRODUCT_COLUMNS);
  let row: Option<ProductRow> = conn.exec_first(sql, params! { "id" => id })?;
  match row {
    Some(row) => Product::from_row(row),
    None => Err(AppError::NotFound("Product")),
  }
}

pub fn get_products_by_ids(conn: &mut PooledConn, ids: &[String]) -> Result<Vec<Product>, AppError> {
  let mut products: Vec<Product> = Vec::with_capacity(ids.len());
  for id in ids {
    products.push(get_product(conn, id)?);
  }
  Ok(products)
}

pub fn create_product(conn: &mut PooledConn, input: &ProductInput) -> Result<Product, AppError> {
  let product = input.to_product(new_id())?;
  conn.exec_drop(
    "INSERT INTO products (id, title, `desc`, img, price, cat_slug, is_featured, created_at)
    VALUES (:id, :title, :desc, :img, :price, :cat_slug, :is_featured, :created_at)",
    params! {
      "id" => product.id.as_str(),
      "title" => product.title.as_str(),
      "desc" => product.desc.as_str(),
      "img" => product.img.as_deref(),
      "price" => product.price.to_string(),
      "cat_slug" => product.cat_slug.as_str(),
      "is_featured" => product.is_featured,
      "created_at" => current_timestamp(),
    },
  )?;
  info!("Created product {} in {}", product.id, product.cat_slug);
  Ok(product)
}

pub fn update_product(conn: &mut PooledConn, id: &str, input: &ProductInput) -> Result<Product, AppError> {
  let current = get_product(conn, id)?;
  let merged = ProductInput {
    title: input.title.clone().or(Some(current.title)),
    desc: input.desc.clone().or(Some(current.desc)),
    img: input.img.clone().or(current.img),
    price: input.price.or(Some(current.price)),
    cat_slug: input.cat_slug.clone().or(Some(current.cat_slug)),
    is_featured: input.is_featured.or(Some(current.is_featured)),
  };
  let product = merged.to_product(current.id)?;
  conn.exec_drop(
    "UPDATE products SET title = :title, `desc` = :desc, img = :img, price = :price,
    cat_slug = :cat_slug, is_featured = :is_featured WHERE id = :id",
    params! {
      "id" => product.id.as_str(),
      "title" => product.title.as_str(),
      "desc" => product.desc.as_str(),
      "img" => product.img.as_deref(),
      "price" => product.price.to_string(),
      "cat_slug" => product.cat_slug.as_str(),
      "is_featured" => product.is_featured,
    },
  )?;
  Ok(product)
}

pub fn delete_product(conn: &mut PooledConn, id: &str) -> Result<(), AppError> {
  conn.exec_drop("DELETE FROM products WHERE id = :id", params! { "id" => id })?;
  if conn.affected_rows() < 1 {
    return Err(AppError::NotFound("Product"));
  }
  info!("Deleted product {}", id);
  Ok(())
}
