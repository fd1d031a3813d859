use crate::utils::error::{CatalogError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// An identifier is valid iff present and strictly positive.
pub fn require_id(code: &'static str, field_name: &str, value: impl Into<Option<i64>>) -> Result<i64> {
    match value.into() {
        Some(id) if id > 0 => Ok(id),
        _ => Err(CatalogError::input(code, format!("{} is required", field_name))),
    }
}

/// Stock is valid iff present and >= 0.
pub fn require_stock(value: impl Into<Option<i32>>) -> Result<i32> {
    match value.into() {
        Some(stock) if stock >= 0 => Ok(stock),
        _ => Err(CatalogError::input("STOCK_INVALID", "stock must be >= 0")),
    }
}

/// Trims the value and rejects it when nothing remains.
pub fn require_name(code: &'static str, entity: &str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(CatalogError::input(code, format!("{} name is required", entity))),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::config(format!(
            "{}: value cannot be empty or whitespace-only",
            field_name
        )));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CatalogError::config(format!(
            "{}: value {} must be between {} and {}",
            field_name, value, min, max
        )));
    }
    Ok(())
}
