use clap::Parser;
use franchise_catalog::utils::{error::ErrorCategory, logger, validation::Validate};
use franchise_catalog::{CatalogConfig, CatalogError, CatalogRunner, CliConfig, InMemoryStore};

fn exit_code(error: &CatalogError) -> i32 {
    match error.category() {
        ErrorCategory::Input => 2,
        ErrorCategory::NotFound => 3,
        ErrorCategory::Conflict => 4,
        ErrorCategory::Internal => 1,
    }
}

fn fail(error: CatalogError) -> ! {
    tracing::error!("❌ {} (code: {}, category: {:?})", error, error.code(), error.category());
    eprintln!("❌ [{}] {}", error.code(), error);
    std::process::exit(exit_code(&error));
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 配置檔載入失敗時日誌尚未初始化，直接輸出到 stderr
    let config = match CatalogConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ [{}] {}: {}", e.code(), cli.config, e);
            std::process::exit(exit_code(&e));
        }
    };

    if cli.json_logs || config.json_logs() {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("Starting franchise-catalog with {}", cli.config);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        fail(e);
    }

    let Some(franchise) = cli.franchise.as_deref().or(config.report_franchise()) else {
        fail(CatalogError::config(
            "no report franchise: pass --franchise or set [report] franchise",
        ));
    };

    let runner = CatalogRunner::new(InMemoryStore::new());
    if let Err(e) = runner.seed(&config.seed).await {
        fail(e);
    }

    let entries = match runner.report(franchise).await {
        Ok(entries) => entries,
        Err(e) => fail(e),
    };
    tracing::info!("✅ {} branches ranked for {}", entries.len(), franchise);

    match serde_json::to_string_pretty(&entries) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e.into()),
    }
}
