//! Product creation input.

use crate::error::{Error, Result};

/// Maximum length of a product name or category, in characters.
const MAX_LABEL_LEN: usize = 200;

/// Validated input for a new product.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: Option<String>,
}

impl NewProduct {
    pub fn new(
        name: &str,
        category: &str,
        price: f64,
        description: Option<&str>,
    ) -> Result<Self> {
        let name = label("name", name)?;
        let category = label("category", category)?;

        if !price.is_finite() || price < 0.0 {
            return Err(Error::validation(
                "price",
                "must be a non-negative number",
            ));
        }

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Self {
            name,
            category,
            price,
            description,
        })
    }
}

fn label(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    if value.chars().count() > MAX_LABEL_LEN {
        return Err(Error::validation(
            field,
            format!("must be at most {MAX_LABEL_LEN} characters"),
        ));
    }
    Ok(value.to_string())
}
