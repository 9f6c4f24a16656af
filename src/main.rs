use clap::Parser;
use goods_client::core::Storage;
use goods_client::utils::error::{ClientError, ErrorSeverity};
use goods_client::utils::{logger, validation::Validate};
use goods_client::{
    Blob, CliConfig, Command, GoodsApi, HttpTransport, LocalStorage, ProductCatalog, TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting goods-client");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let transport = match &config.config {
        Some(path) => {
            let file_config = match TomlConfig::from_file(path).and_then(|c| {
                c.validate()?;
                Ok(c)
            }) {
                Ok(c) => c,
                Err(e) => exit_with(&e),
            };
            tracing::info!("Using settings from {}", path.display());
            HttpTransport::from_config(&file_config)
        }
        None => HttpTransport::from_config(&config),
    };
    tracing::debug!(
        base_url = transport.base_url(),
        mode = ?transport.mode(),
        "Transport configured"
    );

    let goods = GoodsApi::new(Arc::new(transport));

    if let Err(e) = run(&config.command, goods).await {
        exit_with(&e);
    }

    Ok(())
}

async fn run(command: &Command, goods: GoodsApi) -> goods_client::Result<()> {
    match command {
        Command::List => {
            let catalog = ProductCatalog::new(goods);
            for product in catalog.read().await? {
                println!("{:>5}  {:<10}  {}", product.id, product.hs_code, product.name);
            }
        }
        Command::Dashboard { id } => {
            let info = goods.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Chat { id, question } => {
            let answer = goods.chat(id, question).await?;
            println!("{}", answer.answer);
        }
        Command::Report { id, out_dir } => {
            let blob = goods.report(id).await?;
            save(out_dir, blob, &format!("report_{id}.docx")).await?;
        }
        Command::Letter { id, out_dir } => {
            let blob = goods.mosprom_letter(id).await?;
            save(out_dir, blob, &format!("mosprom_letter_{id}.docx")).await?;
        }
    }
    Ok(())
}

async fn save(out_dir: &str, blob: Blob, fallback_name: &str) -> goods_client::Result<()> {
    let storage = LocalStorage::new(out_dir.to_string());
    let file_name = blob
        .file_name
        .clone()
        .unwrap_or_else(|| fallback_name.to_string());

    storage.write_file(&file_name, &blob.data).await?;

    let path = storage.full_path(&file_name);
    tracing::info!("📁 Saved {} bytes to {}", blob.len(), path);
    println!("📁 {}", path);
    Ok(())
}

fn exit_with(e: &ClientError) -> ! {
    tracing::error!(
        "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
