use crate::utils::error::{ProviderError, Result};
use std::net::Ipv4Addr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ProviderError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 驗證 IPv4 CIDR，例如 10.0.0.0/16
pub fn validate_cidr(field_name: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| ProviderError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (address, prefix) = value
        .split_once('/')
        .ok_or_else(|| invalid("CIDR block must look like a.b.c.d/nn"))?;

    address
        .parse::<Ipv4Addr>()
        .map_err(|_| invalid("CIDR block address is not a valid IPv4 address"))?;

    let prefix: u8 = prefix
        .parse()
        .map_err(|_| invalid("CIDR prefix length is not a number"))?;
    if prefix > 32 {
        return Err(invalid("CIDR prefix length must be between 0 and 32"));
    }

    Ok(())
}

pub fn validate_port_range(field_name: &str, from_port: u16, to_port: u16) -> Result<()> {
    if from_port > to_port {
        return Err(ProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}-{}", from_port, to_port),
            reason: "from_port must not be greater than to_port".to_string(),
        });
    }
    Ok(())
}

/// 協定名稱交由 API 判斷 (例如 "tcp"、"TCP"、"-1"、"6")，本地只拒絕空值
pub fn validate_protocol(field_name: &str, protocol: &str) -> Result<()> {
    if protocol.trim().is_empty() {
        return Err(ProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: protocol.to_string(),
            reason: "Protocol cannot be empty".to_string(),
        });
    }
    Ok(())
}

pub fn validate_timeout_seconds(field_name: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(ProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: seconds.to_string(),
            reason: "Timeout must be at least 1 second".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoint", "https://example.com").is_ok());
        assert!(validate_url("endpoint", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("endpoint", "").is_err());
        assert!(validate_url("endpoint", "invalid-url").is_err());
        assert!(validate_url("endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_cidr() {
        assert!(validate_cidr("cidr_block", "10.0.0.0/16").is_ok());
        assert!(validate_cidr("cidr_block", "0.0.0.0/0").is_ok());
        assert!(validate_cidr("cidr_block", "10.0.0.0").is_err());
        assert!(validate_cidr("cidr_block", "10.0.0.0/33").is_err());
        assert!(validate_cidr("cidr_block", "10.0.0/16").is_err());
        assert!(validate_cidr("cidr_block", "10.0.0.0/ab").is_err());
    }

    #[test]
    fn test_validate_port_range_and_protocol() {
        assert!(validate_port_range("firewall_rules[0]", 80, 443).is_ok());
        assert!(validate_port_range("firewall_rules[0]", 443, 443).is_ok());
        assert!(validate_port_range("firewall_rules[0]", 444, 443).is_err());

        assert!(validate_protocol("protocol", "tcp").is_ok());
        assert!(validate_protocol("protocol", "TCP").is_ok());
        assert!(validate_protocol("protocol", "-1").is_ok());
        assert!(validate_protocol("protocol", "6").is_ok());
        assert!(validate_protocol("protocol", "").is_err());
        assert!(validate_protocol("protocol", "  ").is_err());
    }

    #[test]
    fn test_validate_timeout_seconds() {
        assert!(validate_timeout_seconds("request_timeout_seconds", 30).is_ok());
        assert!(matches!(
            validate_timeout_seconds("request_timeout_seconds", 0),
            Err(ProviderError::InvalidConfigValueError { .. })
        ));
    }
}
