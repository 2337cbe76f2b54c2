//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use url::Url;

/// Longest SSID 802.11 allows, in bytes.
const MAX_SSID_LENGTH: usize = 32;

/// Validate the entire configuration.
///
/// Missing parameters are reported before malformed ones so the caller can
/// answer them with the usage text.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_ssid(&config.hotspot.ssid)?;
    validate_password(&config.hotspot.password)?;
    config.output_dir()?;
    validate_gateway(&config.options.gateway)?;
    validate_timeout(config.options.resource_timeout_secs)?;

    Ok(())
}

/// Validate the hotspot SSID.
pub fn validate_ssid(ssid: &str) -> Result<()> {
    if ssid.is_empty() {
        return Err(Error::MissingConfig("ssid".to_string()));
    }

    if ssid.len() > MAX_SSID_LENGTH {
        return Err(Error::ConfigValidation {
            field: "ssid".to_string(),
            message: format!(
                "SSID must be at most {} bytes (got {})",
                MAX_SSID_LENGTH,
                ssid.len()
            ),
        });
    }

    Ok(())
}

/// Validate the hotspot password.
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::MissingConfig("password".to_string()));
    }

    Ok(())
}

/// Validate the console gateway URL.
pub fn validate_gateway(gateway: &str) -> Result<()> {
    let url = Url::parse(gateway).map_err(|e| Error::ConfigValidation {
        field: "gateway".to_string(),
        message: format!("'{}' is not a valid URL: {}", gateway, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: "gateway".to_string(),
            message: format!("Unsupported scheme '{}', expected http", url.scheme()),
        });
    }

    Ok(())
}

/// Validate the per-fetch resource timeout.
pub fn validate_timeout(seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "resource_timeout_secs".to_string(),
            message: "Timeout must be at least 1 second".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn complete_config() -> Config {
        let mut config = Config::default();
        config.hotspot.ssid = "switch_4F2A00".to_string();
        config.hotspot.password = "abcd1234".to_string();
        config.hotspot.output_dir = Some(PathBuf::from("/tmp"));
        config
    }

    #[test]
    fn test_complete_config_is_valid() {
        assert!(validate_config(&complete_config()).is_ok());
    }

    #[test]
    fn test_each_missing_parameter_is_a_usage_error() {
        let mut config = complete_config();
        config.hotspot.ssid.clear();
        assert!(validate_config(&config).unwrap_err().is_usage_error());

        let mut config = complete_config();
        config.hotspot.password.clear();
        assert!(validate_config(&config).unwrap_err().is_usage_error());

        let mut config = complete_config();
        config.hotspot.output_dir = None;
        assert!(validate_config(&config).unwrap_err().is_usage_error());
    }

    #[test]
    fn test_invalid_gateway() {
        assert!(validate_gateway("not a url").is_err());
        assert!(validate_gateway("ftp://192.168.0.1/").is_err());
        assert!(validate_gateway("http://192.168.0.1/").is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        tokio_test::assert_err!(validate_timeout(0));
        tokio_test::assert_ok!(validate_timeout(60));
    }

    #[test]
    fn test_overlong_ssid_rejected() {
        assert!(validate_ssid(&"s".repeat(33)).is_err());
    }
}
