use super::AppError;

/// Id submitted in a form field. Missing, non-numeric and non-positive values
/// are client errors.
pub fn form_id(raw: Option<&str>, field: &str) -> Result<i32, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("Field '{field}' is required")))?;

    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation(format!(
            "Invalid {field}: {raw}. It must be a positive integer"
        ))),
    }
}

/// Id taken from the URL path. A value that cannot name a row is reported
/// the same way as a row that does not exist.
pub fn path_id(raw: &str, resource: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::not_found(format!("{resource} not found")))
}

pub fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("Field '{field}' is required")))
}
