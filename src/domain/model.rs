use crate::utils::error::Result;
use crate::utils::validation::{
    validate_cidr, validate_non_empty_string, validate_port_range, validate_protocol, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub cidr_block: String,
    pub protocol: String,
    pub from_port: u16,
    pub to_port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub destination_cidr_block: String,
    pub next_hop: String,
}

/// 本地宣告式狀態：一個 VPC 資源的扁平欄位
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub region: String,
    pub cidr_block: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_dns_servers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_special_domains: Option<Vec<String>>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub environment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub shared_with: Vec<String>,
    #[serde(default)]
    pub firewall_rules: Vec<FirewallRule>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// 變更後必須重建資源的屬性
pub const REPLACE_ATTRIBUTES: [&str; 2] = ["region", "cidr_block"];

impl VpcState {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        cidr_block: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            cidr_block: cidr_block.into(),
            ..Self::default()
        }
    }

    /// Names of the immutable attributes that differ from `other`.
    pub fn replace_changes(&self, other: &VpcState) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.region != other.region {
            changed.push("region");
        }
        if self.cidr_block != other.cidr_block {
            changed.push("cidr_block");
        }
        changed
    }

    /// Names of the in-place updatable attributes that differ from `other`.
    pub fn mutable_changes(&self, other: &VpcState) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.name != other.name {
            changed.push("name");
        }
        if self.internal_dns_servers != other.internal_dns_servers {
            changed.push("internal_dns_servers");
        }
        if self.dns_special_domains != other.dns_special_domains {
            changed.push("dns_special_domains");
        }
        if self.is_default != other.is_default {
            changed.push("is_default");
        }
        if self.environment_ids != other.environment_ids {
            changed.push("environment_ids");
        }
        if self.owner_id != other.owner_id {
            changed.push("owner_id");
        }
        if self.shared_with != other.shared_with {
            changed.push("shared_with");
        }
        if self.firewall_rules != other.firewall_rules {
            changed.push("firewall_rules");
        }
        if self.routes != other.routes {
            changed.push("routes");
        }
        changed
    }
}

impl Validate for VpcState {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_non_empty_string("region", &self.region)?;
        validate_cidr("cidr_block", &self.cidr_block)?;

        for (index, rule) in self.firewall_rules.iter().enumerate() {
            let field = format!("firewall_rules[{}]", index);
            validate_cidr(&format!("{}.cidr_block", field), &rule.cidr_block)?;
            validate_protocol(&format!("{}.protocol", field), &rule.protocol)?;
            validate_port_range(&field, rule.from_port, rule.to_port)?;
        }

        for (index, route) in self.routes.iter().enumerate() {
            let field = format!("routes[{}]", index);
            validate_cidr(
                &format!("{}.destination_cidr_block", field),
                &route.destination_cidr_block,
            )?;
            validate_non_empty_string(&format!("{}.next_hop", field), &route.next_hop)?;
        }

        Ok(())
    }
}

pub const STATE_FORMAT_VERSION: u32 = 1;

/// 本地狀態檔的內容：資源位址對應到最後一次已知的狀態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDocument {
    pub version: u32,
    #[serde(default)]
    pub resources: BTreeMap<String, VpcState>,
}

impl Default for StateDocument {
    fn default() -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            resources: BTreeMap::new(),
        }
    }
}

impl StateDocument {
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let document: StateDocument = serde_json::from_slice(data)?;
        if document.version != STATE_FORMAT_VERSION {
            return Err(crate::utils::error::ProviderError::StateError {
                message: format!(
                    "Unsupported state format version {} (expected {})",
                    document.version, STATE_FORMAT_VERSION
                ),
            });
        }
        Ok(document)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
