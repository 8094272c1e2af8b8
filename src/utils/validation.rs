use crate::utils::error::{Result, StatsError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> StatsError {
    StatsError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Registry download location; only http(s) with a host is accepted.
pub fn validate_registry_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "no registry URL given"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("not a registry URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(()),
        "http" | "https" => Err(invalid(field_name, url_str, "registry URL has no host")),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("registry must be fetched over http or https, not {}", scheme),
        )),
    }
}

/// Local registry copy; must be a `.json` document.
pub fn validate_registry_file(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;

    let is_json = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(invalid(
            field_name,
            path,
            "registry file must be a .json list of institutions",
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "path is empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "path contains a NUL byte"));
    }
    Ok(())
}

/// Rejects names git itself would never resolve as a branch.
pub fn validate_branch(field_name: &str, branch: &str) -> Result<()> {
    if branch.trim().is_empty() {
        return Err(invalid(field_name, branch, "branch name is empty"));
    }
    if branch.starts_with('-') {
        return Err(invalid(field_name, branch, "branch name cannot start with '-'"));
    }
    if branch.contains("..") || branch.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid(
            field_name,
            branch,
            "branch name contains '..', whitespace or control characters",
        ));
    }
    Ok(())
}

pub fn validate_page_size(field_name: &str, page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(invalid(
            field_name,
            page_size,
            "a detail page must hold at least one patch",
        ));
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
        return Err(invalid(
            field_name,
            value,
            format!("expected a value between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("expected one of: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}
