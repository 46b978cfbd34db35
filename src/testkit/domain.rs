//! Builders for catalog records and normalized products.

use serde_json::{json, Value};

use crate::domain::{NormalizedProduct, Price, RawProduct, StockStatus};

/// A typical in-stock record: `code`, `name`, string `price`, relative `url`
/// and a `category`.
pub fn raw_product(code: &str, price: &str) -> RawProduct {
    raw_from(json!({
        "code": code,
        "name": format!("Product {code}"),
        "price": price,
        "url": format!("/p/{code}"),
        "inStock": true,
        "category": "Tops",
    }))
}

/// Turn a JSON object literal into a raw record. Non-objects become empty records.
pub fn raw_from(value: Value) -> RawProduct {
    match value {
        Value::Object(map) => map,
        _ => RawProduct::new(),
    }
}

/// A normalized product with a formatted display price.
pub fn normalized(key: &str, price: Option<Price>) -> NormalizedProduct {
    NormalizedProduct {
        key: key.to_string(),
        name: format!("Product {key}"),
        price,
        display_price: price.map(|p| format!("₹{p}")).unwrap_or_default(),
        link: format!("https://shop.example/p/{key}"),
        stock: StockStatus::InStock,
        category: "Tops".to_string(),
    }
}
