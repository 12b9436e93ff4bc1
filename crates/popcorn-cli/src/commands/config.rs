use super::lookup_ui::is_interactive;
use super::prompts;
use super::AppContext;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use popcorn_config::{Config, API_KEY_ENV, API_KEY_PLACEHOLDER};
use serde_json::json;
use std::path::Path;

pub async fn run_config(ctx: &AppContext, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(ctx, full, output),
        ConfigCommands::SetApiKey { key } => set_api_key(ctx, key, output),
        ConfigCommands::Init { force } => init_config(ctx, force, output),
        ConfigCommands::Path => {
            let config_file = ctx.paths.config_file();
            match output.format() {
                OutputFormat::Human => println!("{}", config_file.display()),
                OutputFormat::Json | OutputFormat::JsonPretty => {
                    output.json(&json!({ "config_file": config_file.display().to_string() }))
                }
            }
            Ok(())
        }
    }
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let config_file = ctx.paths.config_file();
    let api_key = if full {
        config.omdb.api_key.clone()
    } else {
        mask_string(&config.omdb.api_key)
    };
    let log_target = config
        .logging
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stderr".to_string());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            if !config_file.exists() {
                output.warn(format!("Configuration file not found at: {}", config_file.display()));
                output.info("Defaults are in effect. Run 'popcorn config init' to write a file.");
                println!();
            }

            let mut info_table = Table::new();
            info_table.set_header(vec![
                Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
                Cell::new(config_file.display().to_string()),
            ]);
            info_table.load_preset(comfy_table::presets::UTF8_FULL);
            info_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", info_table);
            println!();

            let mut omdb_table = Table::new();
            omdb_table.set_header(vec![Cell::new("OMDb")
                .fg(comfy_table::Color::Cyan)
                .add_attribute(comfy_table::Attribute::Bold)]);
            omdb_table.add_row(vec![
                Cell::new("Configured"),
                Cell::new(if config.omdb.is_api_key_configured() {
                    "✓".green().to_string()
                } else {
                    "✗".red().to_string()
                }),
            ]);
            omdb_table.add_row(vec![Cell::new("API Key"), Cell::new(api_key)]);
            omdb_table.add_row(vec![Cell::new("Base URL"), Cell::new(&config.omdb.base_url)]);
            omdb_table.load_preset(comfy_table::presets::UTF8_FULL);
            omdb_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", omdb_table);
            println!();

            let mut storage_table = Table::new();
            storage_table.set_header(vec![Cell::new("Storage")
                .fg(comfy_table::Color::Cyan)
                .add_attribute(comfy_table::Attribute::Bold)]);
            storage_table.add_row(vec![Cell::new("Watched Key"), Cell::new(&config.storage.watched_key)]);
            storage_table.add_row(vec![
                Cell::new("Store Directory"),
                Cell::new(ctx.paths.store_dir().display().to_string()),
            ]);
            storage_table.add_row(vec![Cell::new("Log Output"), Cell::new(log_target)]);
            storage_table.load_preset(comfy_table::presets::UTF8_FULL);
            storage_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", storage_table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "exists": config_file.exists(),
                "omdb": {
                    "configured": config.omdb.is_api_key_configured(),
                    "api_key": api_key,
                    "base_url": config.omdb.base_url,
                },
                "storage": {
                    "watched_key": config.storage.watched_key,
                    "store_dir": ctx.paths.store_dir().display().to_string(),
                },
                "logging": { "file": log_target },
            }));
        }
    }

    Ok(())
}

fn set_api_key(ctx: &AppContext, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => {
            if !is_interactive() {
                return Err(color_eyre::eyre::eyre!("No API key given; pass it as an argument"));
            }
            output.info("Request a free key at https://www.omdbapi.com/apikey.aspx");
            prompts::prompt_password("OMDb API key")?
        }
    };
    validate_api_key(&key).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let config_file = ctx.paths.config_file();
    // Start from the file, not the loaded config, so an environment override is never persisted
    let mut config = load_file_config(&config_file)?;
    config.omdb.api_key = key.trim().to_string();
    save_config(&config, &config_file)?;

    output.success(format!("API key saved to {}", config_file.display()));
    if std::env::var_os(API_KEY_ENV).is_some() {
        output.warn(format!("{} is set and takes precedence over the saved key", API_KEY_ENV));
    }
    Ok(())
}

fn init_config(ctx: &AppContext, force: bool, output: &Output) -> Result<()> {
    let config_file = ctx.paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!("Configuration file already exists at: {}", config_file.display()));
        output.info("Use --force to overwrite it.");
        return Ok(());
    }

    ctx.paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;

    let mut config = Config::default();
    config.logging.file = Some(ctx.paths.default_log_file());
    save_config(&config, &config_file)?;

    output.success(format!("Wrote default configuration to {}", config_file.display()));
    output.info("Next: run 'popcorn config set-api-key'");
    Ok(())
}

fn load_file_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    Config::load_from_file(path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", path.display(), e))
}

fn save_config(config: &Config, path: &Path) -> Result<()> {
    config
        .save_to_file(path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", path.display(), e))
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == API_KEY_PLACEHOLDER {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Validates OMDb API key format
fn validate_api_key(input: &str) -> Result<(), &'static str> {
    let input = input.trim();
    if input.is_empty() {
        return Err("API key cannot be empty");
    }
    if input == API_KEY_PLACEHOLDER {
        return Err("API key is still the placeholder value");
    }
    if !input.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("API key should only contain letters and digits");
    }
    Ok(())
}
