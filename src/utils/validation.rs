use crate::utils::error::{RecordError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 驗證非空字串並回傳去除前後空白後的值
pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordError::validation(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RecordError::validation(
            field_name,
            format!("Value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(RecordError::config(format!("{} cannot be empty", field_name)));
    }

    if path.contains('\0') {
        return Err(RecordError::config(format!(
            "{} contains null bytes",
            field_name
        )));
    }

    Ok(())
}

pub fn validate_unique<T: std::hash::Hash + Eq + std::fmt::Debug>(
    field_name: &str,
    values: &[T],
) -> Result<()> {
    if values.is_empty() {
        return Err(RecordError::config(format!(
            "{} must list at least one entry",
            field_name
        )));
    }

    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(RecordError::config(format!(
                "{} lists {:?} more than once",
                field_name, value
            )));
        }
    }
    Ok(())
}
