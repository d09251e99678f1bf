//! Parsing helpers for environment-sourced configuration values.

use std::net::IpAddr;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

pub(crate) fn parse_port(field: &'static str, value: &str) -> ConfigResult<u16> {
    let port: u32 = value
        .parse()
        .map_err(|_| ConfigError::invalid(field, Some(value.to_string()), "must be an integer"))?;
    if !(1..=65_535).contains(&port) {
        return Err(ConfigError::invalid(
            field,
            Some(value.to_string()),
            "must be between 1 and 65535",
        ));
    }
    u16::try_from(port)
        .map_err(|_| ConfigError::invalid(field, Some(value.to_string()), "must fit in u16"))
}

pub(crate) fn parse_bind_addr(field: &'static str, value: &str) -> ConfigResult<IpAddr> {
    value.parse().map_err(|_| {
        ConfigError::invalid(field, Some(value.to_string()), "must be an IP address")
    })
}

pub(crate) fn parse_count(field: &'static str, value: &str) -> ConfigResult<usize> {
    let count: usize = value
        .parse()
        .map_err(|_| ConfigError::invalid(field, Some(value.to_string()), "must be an integer"))?;
    if count == 0 {
        return Err(ConfigError::invalid(
            field,
            Some(value.to_string()),
            "must be positive",
        ));
    }
    Ok(count)
}

pub(crate) fn parse_secs(field: &'static str, value: &str) -> ConfigResult<Duration> {
    let secs: u64 = value
        .parse()
        .map_err(|_| ConfigError::invalid(field, Some(value.to_string()), "must be an integer"))?;
    if secs == 0 {
        return Err(ConfigError::invalid(
            field,
            Some(value.to_string()),
            "must be positive",
        ));
    }
    Ok(Duration::from_secs(secs))
}

pub(crate) fn parse_base_url(field: &'static str, value: &str) -> ConfigResult<String> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::invalid(
            field,
            Some(value.to_string()),
            "must start with http:// or https://",
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}
