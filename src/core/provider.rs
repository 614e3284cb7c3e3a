use crate::config::ProviderConfig;
use crate::core::client::HttpVpcClient;
use crate::core::data_source::VpcListDataSource;
use crate::core::resource::VpcResource;
use crate::core::session::{self, Session};
use crate::domain::diagnostics::Diagnostics;
use crate::domain::model::REPLACE_ATTRIBUTES;
use crate::domain::ports::VpcApi;
use serde::Serialize;

pub const PROVIDER_NAME: &str = "vpc";
pub const RESOURCE_TYPE: &str = "vpc_network";
pub const DATA_SOURCE_TYPE: &str = "vpc_networks";

const CLIENT_SUMMARY: &str = "Unable to Create API Client";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub provider_name: &'static str,
    pub version: &'static str,
    pub resource_types: Vec<&'static str>,
    pub data_sources: Vec<&'static str>,
    pub replace_attributes: Vec<&'static str>,
}

/// 註冊一個資源型別與一個資料來源，並持有 API 客戶端
pub struct Provider<A: VpcApi> {
    api: A,
}

impl Provider<HttpVpcClient> {
    /// 只建立 HTTP 客戶端，不發出任何請求
    pub fn from_config(config: &ProviderConfig) -> Result<Self, Diagnostics> {
        let client = HttpVpcClient::new(config.endpoint(), config.request_timeout())
            .map_err(|e| Diagnostics::from_error(CLIENT_SUMMARY, &e))?;
        Ok(Self::new(client))
    }
}

impl<A: VpcApi> Provider<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            provider_name: PROVIDER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            resource_types: vec![RESOURCE_TYPE],
            data_sources: vec![DATA_SOURCE_TYPE],
            replace_attributes: REPLACE_ATTRIBUTES.to_vec(),
        }
    }

    pub async fn configure(&self, config: &ProviderConfig) -> Result<Session, Diagnostics> {
        session::configure(config, &self.api).await
    }

    pub fn resource(&self) -> VpcResource<'_, A> {
        VpcResource::new(&self.api)
    }

    pub fn data_source(&self) -> VpcListDataSource<'_, A> {
        VpcListDataSource::new(&self.api)
    }
}
