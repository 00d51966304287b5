//! # Validation Utilities
//!
//! Input validation helpers. Errors are user-facing messages.

/// Fail with `"<a>, <b>, and <c> are required"` style messages when any field is blank.
///
/// `fields` pairs a display name with the submitted value.
pub fn validate_required(fields: &[(&str, &str)]) -> Result<(), String> {
    if fields.iter().all(|(_, value)| !value.trim().is_empty()) {
        return Ok(());
    }

    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let list = match names.as_slice() {
        [] => return Ok(()),
        [only] => return Err(format!("{} is required", only)),
        [first, second] => format!("{} and {}", first, second),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    };
    Err(format!("{} are required", list))
}

/// Validate email format (basic check).
pub fn validate_email(email: &str) -> Result<(), String> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') => Ok(()),
        _ => Err("Invalid email format".to_string()),
    }
}

/// Validate minimum length.
pub fn validate_min_length(value: &str, min: usize, field_name: &str) -> Result<(), String> {
    if value.chars().count() < min {
        Err(format!("{} must be at least {} characters", field_name, min))
    } else {
        Ok(())
    }
}
