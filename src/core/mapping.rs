//! Conversions between the flat local state and the nested wire shape.

use crate::domain::model::{FirewallRule, Route, VpcState};
use crate::domain::wire::{
    DnsSettingsRequest, FirewallRequest, FirewallRuleRequest, NetworkRequest, RouteRequest,
    RoutingRequest, VpcRequest, VpcResponse,
};

/// 由宣告式狀態建立完整的請求內容
pub fn expand_vpc_request(state: &VpcState) -> VpcRequest {
    VpcRequest {
        name: state.name.clone(),
        region: state.region.clone(),
        network: NetworkRequest {
            cidr_block: state.cidr_block.clone(),
        },
        dns_settings: DnsSettingsRequest {
            internal_dns_servers: state.internal_dns_servers.clone(),
            special_domains: state.dns_special_domains.clone(),
        },
        is_default: state.is_default,
        environment_ids: state.environment_ids.clone(),
        owner_id: state.owner_id.clone(),
        shared_with: state.shared_with.clone(),
        firewall: FirewallRequest {
            rules: state
                .firewall_rules
                .iter()
                .map(|rule| FirewallRuleRequest {
                    cidr_block: rule.cidr_block.clone(),
                    protocol: rule.protocol.clone(),
                    from_port: rule.from_port,
                    to_port: rule.to_port,
                })
                .collect(),
        },
        routing: RoutingRequest {
            routes: state
                .routes
                .iter()
                .map(|route| RouteRequest {
                    destination_cidr_block: route.destination_cidr_block.clone(),
                    next_hop: route.next_hop.clone(),
                })
                .collect(),
        },
    }
}

/// 將遠端回應攤平成本地狀態；`last_updated` 只存在本地，沿用呼叫者提供的值
pub fn flatten_vpc_response(response: VpcResponse, last_updated: Option<String>) -> VpcState {
    let dns = response.dns_settings.unwrap_or_default();

    VpcState {
        id: Some(response.id),
        name: response.name,
        region: response.region,
        cidr_block: response
            .network
            .map(|network| network.cidr_block)
            .unwrap_or_default(),
        internal_dns_servers: dns.internal_dns_servers,
        dns_special_domains: dns.special_domains,
        is_default: response.is_default,
        environment_ids: response.environment_ids,
        owner_id: response.owner_id,
        shared_with: response.shared_with,
        firewall_rules: response
            .firewall
            .map(|firewall| firewall.rules)
            .unwrap_or_default()
            .into_iter()
            .map(|rule| FirewallRule {
                cidr_block: rule.cidr_block,
                protocol: rule.protocol,
                from_port: rule.from_port,
                to_port: rule.to_port,
            })
            .collect(),
        routes: response
            .routing
            .map(|routing| routing.routes)
            .unwrap_or_default()
            .into_iter()
            .map(|route| Route {
                destination_cidr_block: route.destination_cidr_block,
                next_hop: route.next_hop,
            })
            .collect(),
        last_updated,
    }
}
