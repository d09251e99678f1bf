//! Environment lookup and configuration assembly.
//!
//! # Design
//! - `load_from` takes the variable lookup as a closure so tests never mutate
//!   process environment.
//! - Defaults favour a local development setup; production deployments set
//!   the `STEMGATE_*` variables explicitly.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigResult;
use crate::model::{AppConfig, HttpConfig, LimitsConfig, SmtpConfig, StorageConfig, ToolsConfig};
use crate::validate::{parse_base_url, parse_bind_addr, parse_count, parse_port, parse_secs};

const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_HTTP_PORT: u16 = 8000;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_DEMUCS_MODEL: &str = "htdemucs";
const DEFAULT_MAX_SEPARATIONS: usize = 2;
const DEFAULT_MAX_DOWNLOADS: usize = 4;
const DEFAULT_SEPARATE_TIMEOUT: Duration = Duration::from_secs(900);
const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);
const DEFAULT_SMTP_PORT: u16 = 587;

/// Load configuration from the process environment.
///
/// # Errors
///
/// Returns an error when any `STEMGATE_*` variable holds an invalid value or
/// the SMTP section is only partially configured.
pub fn load_from_env() -> ConfigResult<AppConfig> {
    load_from(|name| std::env::var(name).ok())
}

/// Load configuration through the provided variable lookup.
///
/// # Errors
///
/// Returns an error when any `STEMGATE_*` variable holds an invalid value or
/// the SMTP section is only partially configured.
pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<AppConfig> {
    let bind_addr = match lookup("STEMGATE_BIND_ADDR") {
        Some(raw) => parse_bind_addr("STEMGATE_BIND_ADDR", &raw)?,
        None => DEFAULT_BIND_ADDR,
    };
    let port = match lookup("STEMGATE_HTTP_PORT") {
        Some(raw) => parse_port("STEMGATE_HTTP_PORT", &raw)?,
        None => DEFAULT_HTTP_PORT,
    };
    // SocketAddr formatting brackets IPv6 addresses.
    let public_url = match lookup("STEMGATE_PUBLIC_URL") {
        Some(raw) => parse_base_url("STEMGATE_PUBLIC_URL", &raw)?,
        None => format!("http://{}", SocketAddr::new(bind_addr, port)),
    };
    let cors_origin = lookup("STEMGATE_CORS_ORIGIN").filter(|origin| !origin.is_empty());

    let data_dir = lookup("STEMGATE_DATA_DIR")
        .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
    let demucs_model = lookup("STEMGATE_DEMUCS_MODEL")
        .filter(|model| !model.is_empty())
        .unwrap_or_else(|| DEFAULT_DEMUCS_MODEL.to_string());

    let max_separations = match lookup("STEMGATE_MAX_SEPARATIONS") {
        Some(raw) => parse_count("STEMGATE_MAX_SEPARATIONS", &raw)?,
        None => DEFAULT_MAX_SEPARATIONS,
    };
    let max_downloads = match lookup("STEMGATE_MAX_DOWNLOADS") {
        Some(raw) => parse_count("STEMGATE_MAX_DOWNLOADS", &raw)?,
        None => DEFAULT_MAX_DOWNLOADS,
    };
    let separate_timeout = match lookup("STEMGATE_SEPARATE_TIMEOUT_SECS") {
        Some(raw) => parse_secs("STEMGATE_SEPARATE_TIMEOUT_SECS", &raw)?,
        None => DEFAULT_SEPARATE_TIMEOUT,
    };
    let download_timeout = match lookup("STEMGATE_DOWNLOAD_TIMEOUT_SECS") {
        Some(raw) => parse_secs("STEMGATE_DOWNLOAD_TIMEOUT_SECS", &raw)?,
        None => DEFAULT_DOWNLOAD_TIMEOUT,
    };

    let smtp = load_smtp(&lookup)?;

    Ok(AppConfig {
        http: HttpConfig {
            bind_addr,
            port,
            public_url,
            cors_origin,
        },
        storage: StorageConfig { data_dir },
        tools: ToolsConfig { demucs_model },
        limits: LimitsConfig {
            max_separations,
            max_downloads,
            separate_timeout,
            download_timeout,
        },
        smtp,
    })
}

fn load_smtp(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Option<SmtpConfig>> {
    let host = lookup("STEMGATE_SMTP_HOST");
    let user = lookup("STEMGATE_SMTP_USER");
    let password = lookup("STEMGATE_SMTP_PASSWORD");

    // A partial section is reported rather than silently ignored.
    let (host, user, password) = match (host, user, password) {
        (None, None, None) => return Ok(None),
        (Some(host), Some(user), Some(password)) => (host, user, password),
        (host, user, _) => {
            let field = if host.is_none() {
                "STEMGATE_SMTP_HOST"
            } else if user.is_none() {
                "STEMGATE_SMTP_USER"
            } else {
                "STEMGATE_SMTP_PASSWORD"
            };
            return Err(crate::error::ConfigError::IncompleteSection {
                section: "smtp",
                field,
            });
        }
    };

    let port = match lookup("STEMGATE_SMTP_PORT") {
        Some(raw) => parse_port("STEMGATE_SMTP_PORT", &raw)?,
        None => DEFAULT_SMTP_PORT,
    };
    let from = lookup("STEMGATE_SMTP_FROM").unwrap_or_else(|| user.clone());

    Ok(Some(SmtpConfig {
        host,
        port,
        user,
        password,
        from,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> {
        move |name| vars.get(name).map(ToString::to_string)
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let vars = HashMap::new();
        let config = load_from(lookup_in(&vars)).unwrap();

        assert_eq!(config.http.listen_addr(), "127.0.0.1:8000");
        assert_eq!(config.http.public_url, "http://127.0.0.1:8000");
        assert!(config.http.cors_origin.is_none());
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(config.tools.demucs_model, "htdemucs");
        assert_eq!(config.limits.max_separations, 2);
        assert_eq!(config.limits.max_downloads, 4);
        assert_eq!(config.limits.separate_timeout, Duration::from_secs(900));
        assert_eq!(config.limits.download_timeout, Duration::from_secs(300));
        assert!(config.smtp.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let vars = HashMap::from([
            ("STEMGATE_BIND_ADDR", "0.0.0.0"),
            ("STEMGATE_HTTP_PORT", "9090"),
            ("STEMGATE_PUBLIC_URL", "https://stems.example.com/"),
            ("STEMGATE_CORS_ORIGIN", "https://app.example.com"),
            ("STEMGATE_DATA_DIR", "/var/lib/stemgate"),
            ("STEMGATE_DEMUCS_MODEL", "htdemucs_ft"),
            ("STEMGATE_MAX_SEPARATIONS", "1"),
            ("STEMGATE_DOWNLOAD_TIMEOUT_SECS", "60"),
        ]);
        let config = load_from(lookup_in(&vars)).unwrap();

        assert_eq!(config.http.listen_addr(), "0.0.0.0:9090");
        assert_eq!(config.http.public_url, "https://stems.example.com");
        assert_eq!(
            config.http.cors_origin.as_deref(),
            Some("https://app.example.com")
        );
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/stemgate"));
        assert_eq!(config.tools.demucs_model, "htdemucs_ft");
        assert_eq!(config.limits.max_separations, 1);
        assert_eq!(config.limits.download_timeout, Duration::from_secs(60));
    }

    #[test]
    fn derived_public_url_brackets_ipv6_binds() {
        let vars = HashMap::from([("STEMGATE_BIND_ADDR", "::1")]);
        let config = load_from(lookup_in(&vars)).unwrap();
        assert_eq!(config.http.public_url, "http://[::1]:8000");
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let vars = HashMap::from([("STEMGATE_HTTP_PORT", "not-a-port")]);
        assert!(load_from(lookup_in(&vars)).is_err());

        let vars = HashMap::from([("STEMGATE_MAX_DOWNLOADS", "0")]);
        assert!(load_from(lookup_in(&vars)).is_err());
    }

    #[test]
    fn complete_smtp_section_is_loaded() {
        let vars = HashMap::from([
            ("STEMGATE_SMTP_HOST", "smtp.example.com"),
            ("STEMGATE_SMTP_USER", "mailer@example.com"),
            ("STEMGATE_SMTP_PASSWORD", "hunter2"),
        ]);
        let config = load_from(lookup_in(&vars)).unwrap();
        let smtp = config.smtp.expect("smtp section");

        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.from, "mailer@example.com");
    }

    #[test]
    fn partial_smtp_section_is_an_error() {
        let vars = HashMap::from([("STEMGATE_SMTP_HOST", "smtp.example.com")]);
        let err = load_from(lookup_in(&vars)).unwrap_err();
        assert!(matches!(
            err,
            crate::ConfigError::IncompleteSection { section: "smtp", .. }
        ));
    }
}
