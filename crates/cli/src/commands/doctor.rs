//! `outly doctor`: Diagnose config and credentials.

use outly_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Outly Doctor");
    println!("===============\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults. Run `outly onboard` to create one");
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");

            if config.has_llm_key() {
                println!("  ✅ LLM API key configured ({})", outly_providers::router::provider_name(&config.llm_base_url));

                if let Some(provider) = outly_providers::router::build_from_config(&config) {
                    match provider.health_check().await {
                        Ok(true) => println!("  ✅ LLM provider reachable"),
                        Ok(false) => {
                            println!("  ⚠️  LLM provider answered but reported unhealthy");
                            issues += 1;
                        }
                        Err(e) => {
                            println!("  ❌ LLM provider check failed: {e}");
                            issues += 1;
                        }
                    }
                }
            } else {
                println!("  ❌ No LLM API key. Set GROQ_API_KEY or llm_api_key in config.toml");
                issues += 1;
            }

            if config.has_weather_key() {
                println!("  ✅ Weather API key configured");
            } else {
                println!("  ❌ No weather API key. Set WEATHER_API_KEY or [weather] api_key");
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
