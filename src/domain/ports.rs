use crate::domain::wire::{TokenRequest, TokenResponse, VpcRequest, VpcResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 遠端 API 的介面，資源操作只透過這個 trait 呼叫
#[async_trait]
pub trait VpcApi: Send + Sync {
    async fn exchange_token(&self, request: &TokenRequest) -> Result<TokenResponse>;

    async fn create_vpc(
        &self,
        token: &TokenResponse,
        org_id: &str,
        request: &VpcRequest,
    ) -> Result<VpcResponse>;

    async fn get_vpc(&self, token: &TokenResponse, org_id: &str, vpc_id: &str)
        -> Result<VpcResponse>;

    async fn replace_vpc(
        &self,
        token: &TokenResponse,
        org_id: &str,
        vpc_id: &str,
        request: &VpcRequest,
    ) -> Result<VpcResponse>;

    async fn delete_vpc(&self, token: &TokenResponse, org_id: &str, vpc_id: &str) -> Result<()>;

    async fn list_vpcs(&self, token: &TokenResponse, org_id: &str) -> Result<Vec<VpcResponse>>;
}

pub trait StateStore: Send + Sync {
    fn read_state(&self) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_state(&self, data: &[u8]) -> impl std::future::Future<Output = Result<()>> + Send;
}
