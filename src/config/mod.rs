#[cfg(feature = "cli")]
pub mod cli;
pub mod manifest;

use crate::domain::wire::Credentials;
use crate::utils::error::Result;
use crate::utils::validation::{validate_timeout_seconds, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

pub const ENV_CLIENT_ID: &str = "VPC_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "VPC_CLIENT_SECRET";
pub const ENV_ORG_ID: &str = "VPC_ORG_ID";
pub const ENV_API_ENDPOINT: &str = "VPC_API_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "https://api.example-cloud.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Provider 設定：明確值 > 環境變數 > 預設值
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub org_id: Option<String>,
    pub endpoint: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    /// 未明確設定的欄位改用環境變數
    pub fn with_env_fallback(self) -> Self {
        self.with_env_lookup(|key| env::var(key).ok())
    }

    /// 同 `with_env_fallback`，但由 `lookup` 提供變數值；空字串視為未設定
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if self.client_id.is_none() {
            self.client_id = env_value(ENV_CLIENT_ID);
        }
        if self.client_secret.is_none() {
            self.client_secret = env_value(ENV_CLIENT_SECRET);
        }
        if self.org_id.is_none() {
            self.org_id = env_value(ENV_ORG_ID);
        }
        if self.endpoint.is_none() {
            self.endpoint = env_value(ENV_API_ENDPOINT);
        }
        self
    }

    /// Fills the fields still unset in `self` from `other`.
    pub fn or(mut self, other: &ProviderConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = other.client_id.clone();
        }
        if self.client_secret.is_none() {
            self.client_secret = other.client_secret.clone();
        }
        if self.org_id.is_none() {
            self.org_id = other.org_id.clone();
        }
        if self.endpoint.is_none() {
            self.endpoint = other.endpoint.clone();
        }
        if self.request_timeout_seconds.is_none() {
            self.request_timeout_seconds = other.request_timeout_seconds;
        }
        self
    }

    /// 組織 ID，空字串視為未設定
    pub fn org_id(&self) -> Option<&str> {
        self.org_id.as_deref().filter(|v| !v.trim().is_empty())
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        )
    }

    /// 兩個憑證都有值時才放進 credentials，否則送出空的 credentials
    pub fn credentials(&self) -> Credentials {
        let id = self.client_id.as_deref().filter(|v| !v.is_empty());
        let secret = self.client_secret.as_deref().filter(|v| !v.is_empty());

        match (id, secret) {
            (Some(id), Some(secret)) => Credentials {
                client_id: Some(id.to_string()),
                client_secret: Some(secret.to_string()),
            },
            _ => Credentials::default(),
        }
    }
}

// org id 不在這裡檢查，缺少時由 configure 回報 "Required org id"
impl Validate for ProviderConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            validate_url("endpoint", endpoint)?;
        }
        if let Some(seconds) = self.request_timeout_seconds {
            validate_timeout_seconds("request_timeout_seconds", seconds)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ProviderConfig")
            .field("client_id", &redact(&self.client_id))
            .field("client_secret", &redact(&self.client_secret))
            .field("org_id", &self.org_id)
            .field("endpoint", &self.endpoint)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}
