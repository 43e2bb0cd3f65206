//! `campusbot doctor`: diagnose configuration and connectivity.

use campusbot_config::AppConfig;

pub async fn run(online: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 CampusBot Doctor: System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults (run `campusbot onboard`)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            println!("     Model:        {}", config.model);
            println!("     Temperature:  {}", config.temperature);
            println!("     Endpoint:     {}", config.api_url);
            println!("     Live search:  {}", config.live_search);
            Some(config)
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            issues += 1;
            None
        }
    };

    if let Some(config) = &config {
        if config.has_api_key() {
            println!("  ✅ API key configured");
        } else {
            println!(
                "  ❌ No API key: set {} or add api_key to config.toml",
                campusbot_config::API_KEY_VARS.join(" / ")
            );
            issues += 1;
        }

        if online && config.has_api_key() {
            match campusbot_providers::build_from_config(config) {
                Ok(provider) => match provider.health_check().await {
                    Ok(true) => println!("  ✅ Model service reachable"),
                    Ok(false) => {
                        println!("  ❌ Model service rejected the request (check the key)");
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  ❌ Model service unreachable: {e}");
                        issues += 1;
                    }
                },
                Err(e) => {
                    println!("  ❌ Could not build provider: {e}");
                    issues += 1;
                }
            }
        } else if !online {
            println!("  ℹ️  Skipped connectivity check (pass --online)");
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
