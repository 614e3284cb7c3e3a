use crate::config::ProviderConfig;
use crate::domain::diagnostics::Diagnostics;
use crate::domain::ports::VpcApi;
use crate::domain::wire::{TokenRequest, TokenResponse};
use std::fmt;

pub const REQUIRED_ORG_ID_SUMMARY: &str = "Required org id";
pub const AUTHENTICATION_SUMMARY: &str = "Unable to Authenticate";

/// 設定完成後的連線資訊，建立後不再變動，每個資源操作都明確傳入
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: TokenResponse,
    org_id: String,
}

impl Session {
    pub fn new(token: TokenResponse, org_id: impl Into<String>) -> Self {
        Self {
            token,
            org_id: org_id.into(),
        }
    }

    pub fn token(&self) -> &TokenResponse {
        &self.token
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("org_id", &self.org_id)
            .field("token_type", &self.token.token_type)
            .field("expires_in", &self.token.expires_in)
            .finish()
    }
}

/// 驗證設定並交換 token；缺少 org id 時不發出任何請求
pub async fn configure<A>(config: &ProviderConfig, api: &A) -> Result<Session, Diagnostics>
where
    A: VpcApi + ?Sized,
{
    let Some(org_id) = config.org_id() else {
        tracing::error!("❌ Provider configuration is missing the org id");
        return Err(Diagnostics::single_error(
            REQUIRED_ORG_ID_SUMMARY,
            format!(
                "The provider cannot create the API client because the org id is missing or empty. \
                 Set org_id in the provider configuration or use the {} environment variable.",
                crate::config::ENV_ORG_ID
            ),
        ));
    };

    let request = TokenRequest {
        credentials: config.credentials(),
    };
    if request.credentials.is_empty() {
        tracing::warn!("No client credentials configured, requesting token without them");
    }

    tracing::debug!("Exchanging credentials for org {}", org_id);
    let token = api.exchange_token(&request).await.map_err(|e| {
        tracing::error!("❌ Token exchange failed: {}", e);
        Diagnostics::from_error(AUTHENTICATION_SUMMARY, &e)
    })?;

    tracing::info!("✅ Authenticated for org {}", org_id);
    Ok(Session::new(token, org_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wire::{VpcRequest, VpcResponse};
    use crate::utils::error::{ProviderError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Token-only fake: counts exchanges and remembers the last request.
    struct TokenApi {
        calls: AtomicUsize,
        last_request: Mutex<Option<TokenRequest>>,
        fail_with: Option<String>,
    }

    impl TokenApi {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                fail_with: None,
            }
        }

        fn failing(body: &str) -> Self {
            Self {
                fail_with: Some(body.to_string()),
                ..Self::ok()
            }
        }
    }

    #[async_trait]
    impl VpcApi for TokenApi {
        async fn exchange_token(&self, request: &TokenRequest) -> Result<TokenResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.fail_with {
                Some(body) => Err(ProviderError::ApiError {
                    status: 401,
                    body: body.clone(),
                }),
                None => Ok(TokenResponse {
                    access_token: "tok-1".to_string(),
                    token_type: "Bearer".to_string(),
                    expires_in: Some(3600),
                }),
            }
        }

        async fn create_vpc(&self, _: &TokenResponse, _: &str, _: &VpcRequest) -> Result<VpcResponse> {
            unreachable!("configure never touches VPC endpoints")
        }

        async fn get_vpc(&self, _: &TokenResponse, _: &str, _: &str) -> Result<VpcResponse> {
            unreachable!("configure never touches VPC endpoints")
        }

        async fn replace_vpc(
            &self,
            _: &TokenResponse,
            _: &str,
            _: &str,
            _: &VpcRequest,
        ) -> Result<VpcResponse> {
            unreachable!("configure never touches VPC endpoints")
        }

        async fn delete_vpc(&self, _: &TokenResponse, _: &str, _: &str) -> Result<()> {
            unreachable!("configure never touches VPC endpoints")
        }

        async fn list_vpcs(&self, _: &TokenResponse, _: &str) -> Result<Vec<VpcResponse>> {
            unreachable!("configure never touches VPC endpoints")
        }
    }

    #[tokio::test]
    async fn test_missing_org_id_fails_without_calls() {
        let api = TokenApi::ok();
        let config = ProviderConfig {
            org_id: Some(String::new()),
            client_id: Some(String::new()),
            client_secret: Some(String::new()),
            ..Default::default()
        };

        let diags = configure(&config, &api).await.unwrap_err();

        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.first().unwrap().summary, "Required org id");
    }

    #[tokio::test]
    async fn test_valid_credentials_make_exactly_one_call() {
        let api = TokenApi::ok();
        let config = ProviderConfig {
            org_id: Some("org-1".to_string()),
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            ..Default::default()
        };

        let session = configure(&config, &api).await.unwrap();

        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.org_id(), "org-1");
        assert_eq!(session.token().access_token, "tok-1");

        let sent = api.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.credentials.client_id.as_deref(), Some("id"));
        assert_eq!(sent.credentials.client_secret.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_partial_credentials_are_not_attached() {
        let api = TokenApi::ok();
        let config = ProviderConfig {
            org_id: Some("org-1".to_string()),
            client_id: Some("id".to_string()),
            ..Default::default()
        };

        configure(&config, &api).await.unwrap();

        let sent = api.last_request.lock().unwrap().clone().unwrap();
        assert!(sent.credentials.is_empty());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_token_failure_surfaces_response_body() {
        let api = TokenApi::failing(r#"{"error":"invalid_client"}"#);
        let config = ProviderConfig {
            org_id: Some("org-1".to_string()),
            client_id: Some("id".to_string()),
            client_secret: Some("wrong".to_string()),
            ..Default::default()
        };

        let diags = configure(&config, &api).await.unwrap_err();
        let first = diags.first().unwrap();

        assert_eq!(first.summary, "Unable to Authenticate");
        assert_eq!(first.detail, r#"{"error":"invalid_client"}"#);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint_reports_transport_error() {
        let client = crate::core::client::HttpVpcClient::new(
            "http://127.0.0.1:1",
            std::time::Duration::from_secs(2),
        )
        .unwrap();
        let config = ProviderConfig {
            org_id: Some("org-1".to_string()),
            ..Default::default()
        };

        let diags = configure(&config, &client).await.unwrap_err();

        assert_eq!(diags.len(), 1);
        let first = diags.first().unwrap();
        assert_eq!(first.summary, AUTHENTICATION_SUMMARY);
        assert!(first.detail.starts_with("HTTP request failed"));
    }

    #[test]
    fn test_debug_hides_access_token() {
        let session = Session::new(
            TokenResponse {
                access_token: "very-secret-token".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: None,
            },
            "org-1",
        );
        assert!(!format!("{:?}", session).contains("very-secret-token"));
    }
}
