use crate::utils::error::{MonitorError, Result};
use reqwest::header::{HeaderName, HeaderValue};
use scraper::Selector;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MonitorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
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
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_selector(field_name: &str, selector: &str) -> Result<()> {
    validate_non_empty_string(field_name, selector)?;

    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: selector.to_string(),
            reason: format!("Invalid CSS selector: {}", e),
        })
}

/// Header names and values must be sendable as-is; reqwest rejects the
/// rest when the client is built.
pub fn validate_header(field_name: &str, name: &str, value: &str) -> Result<()> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| MonitorError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: name.to_string(),
        reason: format!("Invalid header name: {}", e),
    })?;

    HeaderValue::from_str(value).map_err(|e| MonitorError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Invalid header value: {}", e),
    })?;

    Ok(())
}
