use anyhow::Context;
use clap::Parser;
use faraid_calc::core::ScenarioProvider;
use faraid_calc::domain::model::HeirCategory;
use faraid_calc::domain::ports::ResultStore;
use faraid_calc::utils::error::ErrorSeverity;
use faraid_calc::utils::{logger, validation::Validate};
use faraid_calc::{render, FaraidEngine, LocalStorage, OutputFormat, SavedResult, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-faraid")]
#[command(about = "Faraid calculator driven by a TOML scenario file")]
struct Args {
    /// Path to TOML scenario file
    #[arg(short, long, default_value = "faraid-scenario.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the output format from the scenario
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Override the save setting from the scenario
    #[arg(long)]
    save: Option<bool>,

    /// Dry run - validate and show the census without computing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("📁 Loading scenario from: {}", args.config);

    // 載入 TOML 情境
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load scenario file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Scenario validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Scenario loaded and validated successfully");
    if args.dry_run || args.verbose {
        display_scenario_summary(&config, &args);
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No shares will be computed");
        return Ok(());
    }

    let census = config.census();
    let estate = config.estate().context("estate was validated but no longer parses")?;

    match FaraidEngine::new().compute(&census, estate) {
        Ok(result) => {
            let format = args.format.unwrap_or_else(|| config.output_format());
            let report = render(&result, format, config.minor_digits())
                .context("rendering distribution")?;
            print!("{}", report);

            if args.save.unwrap_or_else(|| config.save_enabled()) {
                let storage = LocalStorage::new(config.state_dir());
                storage
                    .save_last(
                        &SavedResult::new(census, result, config.minor_digits())
                            .with_currency(config.currency().map(str::to_string)),
                    )
                    .with_context(|| format!("saving result under {}", config.state_dir()))?;
                tracing::info!("📁 Result saved to: {}", storage.last_result_path().display());
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Calculation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_scenario_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Scenario: {}", config.scenario.name);
    if let Some(description) = &config.scenario.description {
        println!("  {}", description);
    }
    println!(
        "  Estate: {} {}",
        config.estate.amount_text(),
        config.currency().unwrap_or("")
    );
    println!("  Decedent: {}", config.census.decedent_sex);

    let heirs: Vec<String> = HeirCategory::ALL
        .iter()
        .filter(|c| config.census.count(**c) > 0)
        .map(|c| format!("{} x{}", c, config.census.count(*c)))
        .collect();
    if heirs.is_empty() {
        println!("  Heirs: none");
    } else {
        println!("  Heirs: {}", heirs.join(", "));
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}
