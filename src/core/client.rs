use crate::domain::ports::VpcApi;
use crate::domain::wire::{TokenRequest, TokenResponse, VpcListResponse, VpcRequest, VpcResponse};
use crate::utils::casing::SnakeCaseJson;
use crate::utils::error::{ProviderError, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// 以 reqwest 實作的 VPC API 客戶端
#[derive(Debug, Clone)]
pub struct HttpVpcClient {
    base_url: Url,
    client: Client,
}

impl HttpVpcClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ProviderError::InvalidConfigValueError {
            field: "endpoint".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidConfigValueError {
                field: "endpoint".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // new() 已排除 cannot-be-a-base，這裡一定拿得到 path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn vpcs_endpoint(&self, org_id: &str) -> Url {
        self.endpoint(&["v1", "organizations", org_id, "vpcs"])
    }

    fn vpc_endpoint(&self, org_id: &str, vpc_id: &str) -> Url {
        self.endpoint(&["v1", "organizations", org_id, "vpcs", vpc_id])
    }

    /// 送出請求並讀完整個回應內容；非 2xx 轉成 ApiError 並保留回應內容
    async fn execute(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait::async_trait]
impl VpcApi for HttpVpcClient {
    async fn exchange_token(&self, request: &TokenRequest) -> Result<TokenResponse> {
        let url = self.endpoint(&["v1", "auth", "token"]);
        tracing::debug!("Requesting access token from: {}", url);

        let builder = self.client.post(url).json(&SnakeCaseJson(request));
        self.execute_json(builder).await.map_err(|e| match e {
            ProviderError::ApiError { status: 401 | 403, .. } => ProviderError::AuthenticationError {
                message: e.detail(),
            },
            other => other,
        })
    }

    async fn create_vpc(
        &self,
        token: &TokenResponse,
        org_id: &str,
        request: &VpcRequest,
    ) -> Result<VpcResponse> {
        let url = self.vpcs_endpoint(org_id);
        tracing::debug!("POST {}", url);

        let builder = self
            .client
            .post(url)
            .bearer_auth(&token.access_token)
            .json(&SnakeCaseJson(request));
        self.execute_json(builder).await
    }

    async fn get_vpc(
        &self,
        token: &TokenResponse,
        org_id: &str,
        vpc_id: &str,
    ) -> Result<VpcResponse> {
        let url = self.vpc_endpoint(org_id, vpc_id);
        tracing::debug!("GET {}", url);

        let builder = self.client.get(url).bearer_auth(&token.access_token);
        self.execute_json(builder).await
    }

    async fn replace_vpc(
        &self,
        token: &TokenResponse,
        org_id: &str,
        vpc_id: &str,
        request: &VpcRequest,
    ) -> Result<VpcResponse> {
        let url = self.vpc_endpoint(org_id, vpc_id);
        tracing::debug!("PUT {}", url);

        let builder = self
            .client
            .put(url)
            .bearer_auth(&token.access_token)
            .json(&SnakeCaseJson(request));
        self.execute_json(builder).await
    }

    async fn delete_vpc(&self, token: &TokenResponse, org_id: &str, vpc_id: &str) -> Result<()> {
        let url = self.vpc_endpoint(org_id, vpc_id);
        tracing::debug!("DELETE {}", url);

        let builder = self.client.delete(url).bearer_auth(&token.access_token);
        self.execute(builder).await?;
        Ok(())
    }

    async fn list_vpcs(&self, token: &TokenResponse, org_id: &str) -> Result<Vec<VpcResponse>> {
        let url = self.vpcs_endpoint(org_id);
        tracing::debug!("GET {}", url);

        let builder = self.client.get(url).bearer_auth(&token.access_token);
        let list: VpcListResponse = self.execute_json(builder).await?;
        Ok(list.into_items())
    }
}
