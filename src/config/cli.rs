use crate::config::manifest::Manifest;
use crate::config::ProviderConfig;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vpc-provider", version, about = "Declarative VPC management")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Client id used for the token exchange")]
    pub client_id: Option<String>,

    #[arg(long, global = true, help = "Client secret used for the token exchange")]
    pub client_secret: Option<String>,

    #[arg(long, global = true)]
    pub org_id: Option<String>,

    #[arg(long, global = true, help = "Base URL of the VPC API")]
    pub endpoint: Option<String>,

    #[arg(long, global = true)]
    pub request_timeout_seconds: Option<u64>,

    #[arg(long, global = true, default_value = "vpc.toml")]
    pub manifest: String,

    #[arg(long, global = true, default_value = "vpc-state.json")]
    pub state: String,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 比較宣告檔與狀態檔，不呼叫遠端
    Plan,
    /// 套用宣告檔
    Apply,
    /// 重新讀取所有已追蹤的 VPC
    Refresh,
    /// 刪除所有已追蹤的 VPC
    Destroy,
    /// 列出組織內所有 VPC
    List,
    /// 顯示 provider 註冊資訊
    Metadata,
}

impl Command {
    pub fn requires_manifest(&self) -> bool {
        matches!(self, Command::Plan | Command::Apply)
    }
}

impl CliConfig {
    /// 命令列參數 > 宣告檔 [provider] > 環境變數 > 預設值
    pub fn provider_config(&self, manifest: Option<&Manifest>) -> ProviderConfig {
        let explicit = ProviderConfig {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            org_id: self.org_id.clone(),
            endpoint: self.endpoint.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
        };

        match manifest {
            Some(manifest) => explicit.or(&manifest.provider),
            None => explicit,
        }
        .with_env_fallback()
    }
}
