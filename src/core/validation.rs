use crate::config::CONFIG;
use crate::core::errors::RupeeError;
use crate::core::money::Money;

pub fn validate_string_input(field: &str, value: &str, max_length: usize) -> Result<(), RupeeError> {
    if value.trim().is_empty() {
        return Err(RupeeError::validation(
            field,
            &format!("Invalid {}", field),
            format!("{} cannot be empty", field),
        ));
    }
    if value.chars().count() > max_length {
        return Err(RupeeError::validation(
            field,
            &format!("{} Too Long", field),
            format!("{} cannot exceed {} characters", field, max_length),
        ));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(RupeeError::validation(
            field,
            &format!("Invalid {}", field),
            format!("{} contains invalid characters", field),
        ));
    }
    Ok(())
}

pub fn validate_name(field: &str, value: &str) -> Result<(), RupeeError> {
    validate_string_input(field, value, CONFIG.max_name_len)
}

pub fn validate_description(field: &str, value: &str) -> Result<(), RupeeError> {
    validate_string_input(field, value, CONFIG.max_description_len)
}

/// Optional free text may be blank but is still length-checked.
pub fn validate_optional_text(field: &str, value: Option<&str>) -> Result<(), RupeeError> {
    match value {
        Some(text) if !text.trim().is_empty() => validate_description(field, text),
        _ => Ok(()),
    }
}

pub fn validate_amount_input(field: &str, amount: Money) -> Result<(), RupeeError> {
    if !amount.is_positive() {
        return Err(RupeeError::validation(
            field,
            "Invalid Amount",
            "Amount must be greater than 0",
        ));
    }
    Ok(())
}
