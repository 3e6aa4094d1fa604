use clap::Parser;
use energy_insights::core::period::format_range_label;
use energy_insights::core::ConfigProvider;
use energy_insights::domain::ports::Clock;
use energy_insights::utils::error::{AnalyticsError, ErrorSeverity};
use energy_insights::utils::logger::{self, LogFormat};
use energy_insights::utils::validation::Validate;
use energy_insights::{
    AnalyticsReportPipeline, CliConfig, Direction, LocalStorage, ReportEngine, ReportRequest,
    SeriesGenerator, SyntheticSource, SystemClock, TomlConfig,
};

async fn run_report<C: ConfigProvider>(
    config: C,
    navigation: Option<(Direction, u32)>,
    monitor_enabled: bool,
) -> energy_insights::Result<String> {
    let clock = SystemClock;
    let request = ReportRequest::from_config(&config, clock.now(), navigation)?;

    tracing::info!(
        "📅 {} ({}) for {}",
        format_range_label(request.period, &request.range),
        request.category,
        request.source_id
    );

    let source = SyntheticSource::with_generator(clock, SeriesGenerator::from_seed_option(config.seed()));
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = AnalyticsReportPipeline::new(source, storage, config, request);

    ReportEngine::new_with_monitoring(pipeline, monitor_enabled)
        .run()
        .await
}

fn exit_with(e: &AnalyticsError) -> ! {
    tracing::error!(
        "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(cli.verbose, format);

    tracing::info!("Starting energy-insights");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        exit_with(&e);
    }

    let navigation = match &cli.navigate {
        Some(direction) => Some((direction.parse::<Direction>()?, cli.steps)),
        None => None,
    };

    let result = if let Some(path) = cli.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let toml_config = match TomlConfig::from_file(&path).and_then(|c| c.validate().map(|()| c)) {
            Ok(config) => config,
            Err(e) => exit_with(&e),
        };
        let monitor = cli.monitor || toml_config.monitoring_enabled();
        run_report(toml_config, navigation, monitor).await
    } else {
        let monitor = cli.monitor;
        run_report(cli, navigation, monitor).await
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Report completed successfully!");
            println!("✅ Report completed successfully!");
            println!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}
