//! Input normalization.
//!
//! Clients send item fields as JSON values or as multipart text, so every
//! field may arrive as a string. [`normalize`] turns that into an
//! [`ItemPayload`] or rejects it with [`CoreError::InvalidField`]. It is pure:
//! nothing downstream ever sees malformed data.
//!
//! Coercion rules:
//!
//! | Field            | Accepts                          | Absent / empty    |
//! |------------------|----------------------------------|-------------------|
//! | `name`           | non-blank text                   | error             |
//! | `price`          | finite number >= 0, or its text  | error             |
//! | `stock`          | whole number >= 0, or its text   | error             |
//! | `originalPrice`  | finite number >= 0, or its text  | no discount       |
//! | `category`       | text                             | `""`              |
//! | `description`    | text                             | `""`              |
//! | flags            | `true` or `"true"`               | `false`           |

use serde::Deserialize;
use serde_json::Value;

use super::item::ItemPayload;
use crate::error::CoreError;

/// Untyped item fields as received from a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItemInput {
    pub name: Option<Value>,
    pub price: Option<Value>,
    pub original_price: Option<Value>,
    pub category: Option<Value>,
    pub stock: Option<Value>,
    pub description: Option<Value>,
    pub in_stock: Option<Value>,
    pub is_new_item: Option<Value>,
    pub is_sale: Option<Value>,
}

impl RawItemInput {
    /// Collect multipart/form text fields. Unknown keys are ignored.
    ///
    /// Both `camelCase` and `snake_case` keys are understood.
    pub fn from_form_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut raw = Self::default();
        for (key, value) in fields {
            raw.set(&key, Value::String(value));
        }
        raw
    }

    /// Set a field by its wire name. Returns `false` for an unknown key.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        let slot = match key {
            "name" => &mut self.name,
            "price" => &mut self.price,
            "originalPrice" | "original_price" => &mut self.original_price,
            "category" => &mut self.category,
            "stock" => &mut self.stock,
            "description" => &mut self.description,
            "inStock" | "in_stock" => &mut self.in_stock,
            "isNewItem" | "is_new_item" => &mut self.is_new_item,
            "isSale" | "is_sale" => &mut self.is_sale,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Validate and coerce raw input into a typed payload.
pub fn normalize(raw: &RawItemInput) -> Result<ItemPayload, CoreError> {
    let name = text("name", raw.name.as_ref())?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::invalid("name", "is required"));
    }

    let price = number("price", raw.price.as_ref())?
        .ok_or_else(|| CoreError::invalid("price", "is required"))?;
    ensure_non_negative("price", price)?;

    let original_price = number("originalPrice", raw.original_price.as_ref())?;
    if let Some(p) = original_price {
        ensure_non_negative("originalPrice", p)?;
    }

    let stock = number("stock", raw.stock.as_ref())?
        .ok_or_else(|| CoreError::invalid("stock", "is required"))?;
    let stock = whole_count("stock", stock)?;

    Ok(ItemPayload {
        name: name.to_string(),
        price,
        original_price,
        category: text("category", raw.category.as_ref())?,
        stock,
        description: text("description", raw.description.as_ref())?,
        in_stock: flag(raw.in_stock.as_ref()),
        is_new_item: flag(raw.is_new_item.as_ref()),
        is_sale: flag(raw.is_sale.as_ref()),
    })
}

/// Optional text; absent or `null` is empty.
fn text(field: &'static str, value: Option<&Value>) -> Result<String, CoreError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(CoreError::invalid(field, "expected text")),
    }
}

/// A finite number, or `None` when absent, `null`, or blank text.
fn number(field: &'static str, value: Option<&Value>) -> Result<Option<f64>, CoreError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>().ok()
        }
        Some(_) => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(CoreError::invalid(field, "expected a finite number")),
    }
}

fn ensure_non_negative(field: &'static str, n: f64) -> Result<(), CoreError> {
    if n < 0.0 {
        Err(CoreError::invalid(field, "must not be negative"))
    } else {
        Ok(())
    }
}

fn whole_count(field: &'static str, n: f64) -> Result<i32, CoreError> {
    ensure_non_negative(field, n)?;
    if n.fract() != 0.0 {
        return Err(CoreError::invalid(field, "must be a whole number"));
    }
    if n > f64::from(i32::MAX) {
        return Err(CoreError::invalid(field, "is too large"));
    }
    Ok(n as i32)
}

/// `true` or `"true"`; everything else, including absence, is `false`.
fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}
