//! `campusbot onboard`: first-time setup.

use campusbot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("🎓 CampusBot: First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!(
            "   1. Add your Gemini API key to {} (or export {})",
            config_path.display(),
            campusbot_config::API_KEY_VARS[1]
        );
        println!("   2. Run: campusbot doctor --online");
        println!("   3. Run: campusbot chat\n");
    }

    println!("🎉 Setup complete! Run `campusbot chat` to start chatting.\n");

    Ok(())
}
