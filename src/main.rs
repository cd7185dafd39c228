use anyhow::Context;
use clap::Parser;
use faraid_calc::core::ScenarioProvider;
use faraid_calc::domain::ports::ResultStore;
use faraid_calc::utils::error::{ErrorSeverity, FaraidError};
use faraid_calc::utils::{logger, validation::Validate};
use faraid_calc::{render, CliConfig, FaraidEngine, LocalStorage, SavedResult};

fn exit_with(e: &FaraidError) -> ! {
    tracing::error!(
        "❌ Calculation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let storage = LocalStorage::new(config.state_dir.clone());

    if config.show_last {
        let saved = match storage.load_last() {
            Ok(saved) => saved,
            Err(e) => exit_with(&e),
        };
        match saved {
            Some(saved) => {
                match &saved.currency {
                    Some(currency) => {
                        println!("Saved at {} ({})", saved.saved_at.to_rfc3339(), currency)
                    }
                    None => println!("Saved at {}", saved.saved_at.to_rfc3339()),
                }
                // 使用儲存時的小數位數, 而非目前的 --minor-digits
                let report = render(&saved.result, config.output_format(), saved.minor_digits)
                    .context("rendering saved result")?;
                print!("{}", report);
            }
            None => println!("No saved result in {}", config.state_dir),
        }
        return Ok(());
    }

    let census = config.census();
    let estate = match config.estate() {
        Ok(estate) => estate,
        Err(e) => exit_with(&e),
    };

    let result = match FaraidEngine::new().compute(&census, estate) {
        Ok(result) => result,
        Err(e) => exit_with(&e),
    };

    let report = render(&result, config.output_format(), config.minor_digits())
        .context("rendering distribution")?;
    print!("{}", report);

    if config.save {
        let saved = SavedResult::new(census, result, config.minor_digits());
        if let Err(e) = storage.save_last(&saved) {
            exit_with(&e);
        }
        tracing::info!("📁 Result saved to: {}", storage.last_result_path().display());
    }

    Ok(())
}
