use clap::Parser;
use git_uni_stats::core::ConfigProvider;
use git_uni_stats::utils::error::{ErrorSeverity, StatsError};
use git_uni_stats::utils::{logger, validation::Validate};
use git_uni_stats::{CliConfig, ContributionPipeline, EtlEngine, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 有 --config 時整份設定改由 TOML 提供
    let toml = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let log_format = toml
        .as_ref()
        .and_then(|t| t.log_format())
        .unwrap_or(cli.log_format.as_str())
        .to_string();
    logger::init_logger(&log_format, cli.verbose);

    tracing::info!("Starting git-uni-stats");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match toml {
        Some(config) => {
            tracing::info!("📁 Configuration loaded from {:?}", cli.config);
            let monitor_enabled = cli.monitor || config.monitoring_enabled();
            run(config, monitor_enabled).await
        }
        None => {
            let monitor_enabled = cli.monitor;
            run(cli, monitor_enabled).await
        }
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run<C>(config: C, monitor_enabled: bool) -> i32
where
    C: ConfigProvider + Validate,
{
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return 1;
    }

    display_config_summary(&config);

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ContributionPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Statistics completed successfully!");
            println!("✅ Statistics completed successfully!");
            println!("📁 Output saved to: {}", output_path);
            0
        }
        Err(e) => report_failure(&e),
    }
}

fn display_config_summary(config: &impl ConfigProvider) {
    println!("📋 Configuration Summary:");
    println!("  Repository: {} ({})", config.repo_label(), config.repo_path());
    println!("  Branch: {}", config.branch());
    match config.registry_file() {
        Some(file) => println!("  Registry: {}", file),
        None => println!("  Registry: {}", config.registry_url()),
    }
    println!("  Output: {}", config.output_path());
    println!("  Page size: {}", config.page_size());
    if config.archive_enabled() {
        println!("  Bundle: report.zip");
    }
    println!();
}

fn report_failure(e: &StatsError) -> i32 {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
