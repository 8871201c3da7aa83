use crate::utils::error::{EtlError, Result};
use chrono_tz::Tz;
use std::fmt::Display;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> EtlError {
    EtlError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 價格來源必須是可 GET 的 http(s) 絕對網址
pub fn validate_source_url(field: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(invalid(field, url, "price source URL is empty"));
    }

    let parsed = Url::parse(url)
        .map_err(|e| invalid(field, url, format!("not a valid price source URL: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            url,
            format!("price sources are fetched over http(s), not {}", parsed.scheme()),
        ));
    }
    if parsed.host_str().is_none() {
        return Err(invalid(field, url, "price source URL has no host"));
    }
    Ok(())
}

pub fn validate_output_dir(field: &str, dir: &str) -> Result<()> {
    if dir.trim().is_empty() {
        return Err(invalid(field, dir, "output directory is empty"));
    }
    if dir.contains('\0') {
        return Err(invalid(field, dir.escape_default(), "output directory contains a NUL byte"));
    }
    Ok(())
}

/// 檔名不可包含路徑分隔符，避免寫出 output_dir 之外
pub fn validate_file_name(field: &str, file_name: &str) -> Result<()> {
    if file_name.trim().is_empty() {
        return Err(invalid(field, file_name, "output file name is empty"));
    }
    if file_name.contains(['/', '\\', '\0']) || file_name == "." || file_name == ".." {
        return Err(invalid(
            field,
            file_name.escape_default(),
            "output file name must be a bare name inside output_dir",
        ));
    }
    Ok(())
}

pub fn validate_at_least(field: &str, value: usize, min: usize) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("must be at least {}", min)));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("must be between {} and {}", min, max)));
    }
    Ok(())
}

pub fn validate_timezone(field: &str, name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| invalid(field, name, format!("unknown IANA timezone: {}", e)))
}
