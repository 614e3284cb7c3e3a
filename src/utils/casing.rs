//! Request payload key rewriting.
//!
//! The remote API expects lowercase, underscore separated keys. Request types
//! serialize with capitalized names, and [`SnakeCaseJson`] rewrites every
//! quoted key token of the serialized text. The rewrite is purely textual: an
//! underscore goes in at each lowercase-to-uppercase boundary, so acronym runs
//! collapse (`InternalDNSServers` becomes `internal_dnsservers`).

use crate::utils::error::Result;
use regex::{Captures, Regex};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

fn key_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([\w ]+)":"#).expect("key token regex is valid"))
}

fn word_boundary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-z])([A-Z])").expect("word boundary regex is valid"))
}

/// 單一 key 的轉換：去除空白、在小寫接大寫處插入底線、整體轉小寫
pub fn snake_case_key(key: &str) -> String {
    let compact: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    word_boundary_regex()
        .replace_all(&compact, "${1}_${2}")
        .to_lowercase()
}

/// 對已序列化的 JSON 文字改寫所有 `"Key":` 形式的 token
pub fn rewrite_keys(json: &str) -> String {
    key_token_regex()
        .replace_all(json, |caps: &Captures| {
            format!("\"{}\":", snake_case_key(&caps[1]))
        })
        .into_owned()
}

pub fn to_snake_case_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let raw = serde_json::to_string(value)?;
    Ok(rewrite_keys(&raw))
}

/// Wraps a value so that serializing it yields snake_case keys.
pub struct SnakeCaseJson<T>(pub T);

impl<T: Serialize> SnakeCaseJson<T> {
    pub fn to_json_string(&self) -> Result<String> {
        to_snake_case_json(&self.0)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        let rewritten = self.to_json_string()?;
        Ok(serde_json::from_str(&rewritten)?)
    }
}

impl<T: Serialize> Serialize for SnakeCaseJson<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let value = self.to_value().map_err(serde::ser::Error::custom)?;
        value.serialize(serializer)
    }
}

impl<T: Serialize> fmt::Display for SnakeCaseJson<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_json_string().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Sample {
        cidr_block: String,
        is_default: bool,
        firewall_rules: Vec<Rule>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Rule {
        from_port: u16,
    }

    #[test]
    fn test_snake_case_key_simple_words() {
        assert_eq!(snake_case_key("CidrBlock"), "cidr_block");
        assert_eq!(snake_case_key("Name"), "name");
        assert_eq!(snake_case_key("environmentIds"), "environment_ids");
        assert_eq!(snake_case_key("already_snake"), "already_snake");
    }

    #[test]
    fn test_snake_case_key_acronym_runs() {
        // 只看小寫接大寫的邊界，連續大寫不拆開
        assert_eq!(snake_case_key("InternalDNSServers"), "internal_dnsservers");
        assert_eq!(snake_case_key("VPCId"), "vpcid");
        assert_eq!(snake_case_key("userID"), "user_id");
        assert_eq!(snake_case_key("HTTPServerURL"), "httpserver_url");
        assert_eq!(snake_case_key("aBcDe"), "a_bc_de");
    }

    #[test]
    fn test_snake_case_key_strips_whitespace() {
        assert_eq!(snake_case_key("Cidr Block"), "cidr_block");
        assert_eq!(snake_case_key(" Next Hop "), "next_hop");
    }

    #[test]
    fn test_nested_struct_keys_are_rewritten() {
        let sample = Sample {
            cidr_block: "10.0.0.0/16".to_string(),
            is_default: true,
            firewall_rules: vec![Rule { from_port: 443 }],
        };

        let value = SnakeCaseJson(&sample).to_value().unwrap();
        assert_eq!(
            value,
            json!({
                "cidr_block": "10.0.0.0/16",
                "is_default": true,
                "firewall_rules": [{"from_port": 443}]
            })
        );
    }

    #[test]
    fn test_string_values_are_untouched() {
        let value = json!({"Name": "MyNetwork", "Tags": ["CamelCase"]});
        let text = to_snake_case_json(&value).unwrap();
        assert!(text.contains("\"name\":\"MyNetwork\""));
        assert!(text.contains("\"CamelCase\""));
    }

    #[test]
    fn test_serialize_impl_and_display_agree() {
        let value = json!({"OwnerId": "u-1"});
        let wrapped = SnakeCaseJson(&value);
        let via_serde = serde_json::to_string(&wrapped).unwrap();
        assert_eq!(via_serde, wrapped.to_string());
        assert_eq!(via_serde, r#"{"owner_id":"u-1"}"#);
    }
}
