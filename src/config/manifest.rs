use crate::config::ProviderConfig;
use crate::core::provider::RESOURCE_TYPE;
use crate::domain::model::VpcState;
use crate::utils::error::{ProviderError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 宣告檔：provider 設定加上以標籤命名的 VPC
///
/// ```toml
/// [provider]
/// org_id = "${VPC_ORG_ID}"
///
/// [vpc.main]
/// name = "net1"
/// region = "us-east-1"
/// cidr_block = "10.0.0.0/16"
///
/// [[vpc.main.firewall_rules]]
/// cidr_block = "0.0.0.0/0"
/// protocol = "tcp"
/// from_port = 443
/// to_port = 443
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub vpc: BTreeMap<String, VpcState>,
}

impl Manifest {
    /// 從 TOML 檔案載入宣告
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProviderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析宣告
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ProviderError::ConfigValidationError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VPC_ORG_ID})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// `vpc_network.<label>` 形式的資源位址
    pub fn address(label: &str) -> String {
        format!("{}.{}", RESOURCE_TYPE, label)
    }

    pub fn resources(&self) -> impl Iterator<Item = (String, &VpcState)> {
        self.vpc
            .iter()
            .map(|(label, state)| (Self::address(label), state))
    }
}

impl Validate for Manifest {
    fn validate(&self) -> Result<()> {
        self.provider.validate().map_err(|e| match e {
            ProviderError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => ProviderError::InvalidConfigValueError {
                field: format!("provider.{}", field),
                value,
                reason,
            },
            other => other,
        })?;

        for (label, state) in &self.vpc {
            if label.contains('.') || label.trim().is_empty() {
                return Err(ProviderError::InvalidConfigValueError {
                    field: "vpc".to_string(),
                    value: label.clone(),
                    reason: "Resource labels must be non-empty and must not contain '.'"
                        .to_string(),
                });
            }
            if state.id.is_some() || state.last_updated.is_some() {
                return Err(ProviderError::InvalidConfigValueError {
                    field: format!("vpc.{}", label),
                    value: label.clone(),
                    reason: "id and last_updated are computed and cannot be declared".to_string(),
                });
            }
            state.validate().map_err(|e| match e {
                ProviderError::InvalidConfigValueError {
                    field,
                    value,
                    reason,
                } => ProviderError::InvalidConfigValueError {
                    field: format!("vpc.{}.{}", label, field),
                    value,
                    reason,
                },
                other => other,
            })?;
        }

        Ok(())
    }
}
