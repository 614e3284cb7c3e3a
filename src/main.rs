use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use vpc_provider::utils::error::ErrorCategory;
use vpc_provider::utils::{logger, validation::Validate};
use vpc_provider::{
    CliConfig, Command, Diagnostics, FileStateStore, Manifest, Provider, ProviderEngine,
    ProviderError,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌 (stderr)
    logger::init_cli_logger(config.verbose, config.log_json);

    tracing::info!("Starting vpc-provider {:?}", config.command);

    if let Err(e) = run(&config).await {
        let exit_code = report(&e);
        std::process::exit(exit_code);
    }
}

async fn run(config: &CliConfig) -> anyhow::Result<()> {
    let manifest = load_manifest(config)?;
    let provider_config = config.provider_config(manifest.as_ref());
    if config.verbose {
        tracing::debug!("Provider config: {:?}", provider_config);
    }

    provider_config.validate()?;
    let provider = Provider::from_config(&provider_config)?;

    if config.command == Command::Metadata {
        return print_json(&provider.metadata());
    }

    let store = FileStateStore::new(&config.state);
    tracing::debug!("State file: {}", store.path().display());
    let engine = ProviderEngine::new(provider, store);

    if config.command == Command::Plan {
        let manifest = manifest.unwrap_or_default();
        return print_json(&engine.plan(&manifest).await?);
    }

    let session = engine.provider().configure(&provider_config).await?;

    match config.command {
        Command::Apply => {
            let manifest = manifest.unwrap_or_default();
            let applied = engine.apply(&session, &manifest).await?;
            tracing::info!("✅ Apply complete: {} change(s)", applied.len());
            print_json(&applied)
        }
        Command::Refresh => {
            let state = engine.refresh(&session).await?;
            tracing::info!("✅ Refreshed {} VPC(s)", state.resources.len());
            print_json(&state)
        }
        Command::Destroy => {
            let destroyed = engine.destroy(&session).await?;
            tracing::info!("🗑️ Destroyed {} VPC(s)", destroyed.len());
            print_json(&destroyed)
        }
        Command::List => {
            let vpcs = engine.provider().data_source().read(&session).await?;
            print_json(&vpcs)
        }
        Command::Plan | Command::Metadata => Ok(()),
    }
}

fn load_manifest(config: &CliConfig) -> anyhow::Result<Option<Manifest>> {
    let path = std::path::Path::new(&config.manifest);
    if !path.exists() {
        if config.command.requires_manifest() {
            return Err(ProviderError::MissingConfigError {
                field: format!("manifest file {}", config.manifest),
            }
            .into());
        }
        return Ok(None);
    }

    let manifest = Manifest::from_file(path)?;
    manifest.validate()?;
    tracing::info!("📄 Loaded manifest {} ({} VPC)", config.manifest, manifest.vpc.len());
    Ok(Some(manifest))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", output);
    Ok(())
}

/// 輸出錯誤並回傳退出碼
fn report(error: &anyhow::Error) -> i32 {
    if let Some(diags) = error.downcast_ref::<Diagnostics>() {
        for diag in diags.iter() {
            tracing::error!("❌ {}", diag);
            eprintln!("❌ {}: {}", diag.summary, diag.detail);
        }
        return 1;
    }

    if let Some(e) = error.downcast_ref::<ProviderError>() {
        tracing::error!("❌ {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.detail());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        return match e.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Authentication => 3,
            ErrorCategory::Api => 4,
            ErrorCategory::LocalState => 5,
        };
    }

    tracing::error!("❌ {:#}", error);
    eprintln!("❌ {:#}", error);
    1
}
