use crate::utils::error::{GluonError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid_value(field_name: &str, value: &str, reason: impl Into<String>) -> GluonError {
    GluonError::InvalidConfigValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts absolute http(s) URLs only.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid_value(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid_value(field_name, url_str, format!("not a valid URL ({})", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid_value(
            field_name,
            url_str,
            format!("scheme '{}' is not http or https", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid_value(field_name, url_str, "URL has no host"));
    }
    Ok(())
}

/// Resource paths are built by plain concatenation, so the base must end
/// with exactly the separator the relative paths omit.
pub fn validate_endpoint(field_name: &str, endpoint: &str) -> Result<()> {
    validate_url(field_name, endpoint)?;
    if !endpoint.ends_with('/') {
        return Err(invalid_value(field_name, endpoint, "Endpoint must end with '/'"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid_value(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid_value(
            field_name,
            &value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// Checks a caller-supplied identifier before it is spliced into a
/// resource path. Rejections happen before any request is issued.
pub fn validate_path_segment(field_name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(GluonError::InvalidArgument {
            field: field_name.to_string(),
            reason: "cannot be empty".to_string(),
        });
    }
    if let Some(c) = value.chars().find(|c| matches!(c, '/' | '?' | '#')) {
        return Err(GluonError::InvalidArgument {
            field: field_name.to_string(),
            reason: format!("must not contain '{}'", c),
        });
    }
    Ok(())
}

/// Rejects an empty free-form request argument (zone, host, device id).
pub fn validate_argument(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GluonError::InvalidArgument {
            field: field_name.to_string(),
            reason: "cannot be empty".to_string(),
        });
    }
    Ok(())
}
