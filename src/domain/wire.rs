//! Remote API payloads.
//!
//! Request types serialize with PascalCase names and are always sent through
//! [`crate::utils::casing::SnakeCaseJson`]; response types deserialize the
//! snake_case keys the API returns.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.client_id.is_none() && self.client_secret.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TokenRequest {
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcRequest {
    pub name: String,
    pub region: String,
    pub network: NetworkRequest,
    pub dns_settings: DnsSettingsRequest,
    pub is_default: bool,
    pub environment_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub shared_with: Vec<String>,
    pub firewall: FirewallRequest,
    pub routing: RoutingRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkRequest {
    pub cidr_block: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DnsSettingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_dns_servers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_domains: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirewallRequest {
    pub rules: Vec<FirewallRuleRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirewallRuleRequest {
    pub cidr_block: String,
    pub protocol: String,
    pub from_port: u16,
    pub to_port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoutingRequest {
    pub routes: Vec<RouteRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteRequest {
    pub destination_cidr_block: String,
    pub next_hop: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub network: Option<NetworkResponse>,
    #[serde(default)]
    pub dns_settings: Option<DnsSettingsResponse>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub environment_ids: Vec<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub shared_with: Vec<String>,
    #[serde(default)]
    pub firewall: Option<FirewallResponse>,
    #[serde(default)]
    pub routing: Option<RoutingResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkResponse {
    #[serde(default)]
    pub cidr_block: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsSettingsResponse {
    #[serde(default)]
    pub internal_dns_servers: Option<Vec<String>>,
    #[serde(default)]
    pub special_domains: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirewallResponse {
    #[serde(default)]
    pub rules: Vec<FirewallRuleResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirewallRuleResponse {
    pub cidr_block: String,
    pub protocol: String,
    pub from_port: u16,
    pub to_port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingResponse {
    #[serde(default)]
    pub routes: Vec<RouteResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub destination_cidr_block: String,
    pub next_hop: String,
}

/// 列表端點的回應，同時接受 `{"items": [...]}` 與裸陣列
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VpcListResponse {
    Wrapped { items: Vec<VpcResponse> },
    Bare(Vec<VpcResponse>),
}

impl VpcListResponse {
    pub fn into_items(self) -> Vec<VpcResponse> {
        match self {
            VpcListResponse::Wrapped { items } => items,
            VpcListResponse::Bare(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::casing::SnakeCaseJson;
    use serde_json::json;

    #[test]
    fn test_token_request_wire_form() {
        let request = TokenRequest {
            credentials: Credentials {
                client_id: Some("id".to_string()),
                client_secret: Some("secret".to_string()),
            },
        };
        let value = SnakeCaseJson(&request).to_value().unwrap();
        assert_eq!(
            value,
            json!({"credentials": {"client_id": "id", "client_secret": "secret"}})
        );
    }

    #[test]
    fn test_empty_credentials_wire_form() {
        let value = SnakeCaseJson(&TokenRequest::default()).to_value().unwrap();
        assert_eq!(value, json!({"credentials": {}}));
    }

    #[test]
    fn test_list_response_accepts_both_shapes() {
        let wrapped: VpcListResponse =
            serde_json::from_value(json!({"items": [{"id": "vpc-1"}]})).unwrap();
        assert_eq!(wrapped.into_items().len(), 1);

        let bare: VpcListResponse =
            serde_json::from_value(json!([{"id": "vpc-1"}, {"id": "vpc-2"}])).unwrap();
        assert_eq!(bare.into_items().len(), 2);
    }
}
