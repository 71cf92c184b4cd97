use crate::error::ValidationError;
use crate::product_store::record_position;
use crate::Product;
use serde_json::{Map, Value};

// Largest magnitude where every whole f64 is also an exact i64.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Raw text of the edit form controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub id: String, // hidden field
    pub name: String,
    pub desc: String,
    pub price: String,
    pub stock: String,
}

impl FormFields {
    /// Render a stored product into form text. Missing values become empty strings.
    pub fn from_product(product: &Product) -> Self {
        FormFields {
            id: product.id.clone(),
            name: product.name.clone(),
            desc: product.desc.clone().unwrap_or_default(),
            price: product.price.map(|p| p.to_string()).unwrap_or_default(),
            stock: product.stock.map(|s| s.to_string()).unwrap_or_default(),
        }
    }

    /// Trim and parse the editable fields.
    pub fn validate(&self) -> Result<ProductEdit, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let price = parse_price(&self.price).ok_or_else(|| ValidationError::InvalidPrice(self.price.clone()))?;
        let stock = parse_stock(&self.stock).ok_or_else(|| ValidationError::InvalidStock(self.stock.clone()))?;

        Ok(ProductEdit {
            name: name.to_string(),
            desc: self.desc.trim().to_string(),
            price,
            stock,
            image: None,
        })
    }
}

/// Validated values to write into one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEdit {
    pub name: String,
    pub desc: String,
    pub price: f64,
    pub stock: i64,
    pub image: Option<String>,
}

impl ProductEdit {
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Write the edited fields into a stored record. Other keys are left alone.
    pub fn apply_to(&self, record: &mut Map<String, Value>) {
        record.insert("name".to_string(), Value::from(self.name.clone()));
        record.insert("desc".to_string(), Value::from(self.desc.clone()));
        record.insert("price".to_string(), price_json(self.price));
        record.insert("stock".to_string(), Value::from(self.stock));
        record.insert("image".to_string(), Value::from(self.image.clone()));
    }
}

/// Whole prices are written as JSON integers (`3`, not `3.0`).
fn price_json(price: f64) -> Value {
    if price.fract() == 0.0 && price.abs() <= EXACT_INT_LIMIT {
        Value::from(price as i64)
    } else {
        Value::from(price)
    }
}

/// Copy of `records` with the record `id` updated in place.
///
/// Every other record comes back exactly as given and in the same position.
/// Returns `None` when no record has that id.
pub fn merge_edit(records: &[Value], id: &str, edit: &ProductEdit) -> Option<Vec<Value>> {
    let index = record_position(records, id)?;
    let mut updated = records.to_vec();
    edit.apply_to(updated[index].as_object_mut()?);
    Some(updated)
}

/// Length of the run of ASCII digits at the start of `bytes`.
fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

/// Read a decimal number from the start of `raw`, ignoring anything after it.
///
/// `" 3.5kg"` reads as 3.5, `"abc"` and `""` read as nothing.
pub fn parse_price(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = sign_len(bytes);
    let int_digits = digit_run(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(&bytes[end + 1..]);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_sign = sign_len(&bytes[end + 1..]);
        let exp_digits = digit_run(&bytes[end + 1 + exp_sign..]);
        if exp_digits > 0 {
            end += 1 + exp_sign + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read a base-10 integer from the start of `raw`, ignoring anything after it.
///
/// `"4.7"` reads as 4. Values past the `i64` range saturate at its bounds.
pub fn parse_stock(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let sign = sign_len(bytes);
    let digits = digit_run(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    match s[..sign + digits].parse::<i64>() {
        Ok(stock) => Some(stock),
        // Only overflow is left once the run is all digits.
        Err(_) if bytes.first() == Some(&b'-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}
