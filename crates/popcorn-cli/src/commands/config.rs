use super::prompts;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_config::{Config, CredentialStore, PathManager, API_KEY_ENV};
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Omdb { api_key, base_url } => configure_omdb(api_key, base_url, output),
        ConfigCommands::Init { force } => init_config(force, output),
    }
}

fn load_config(path_manager: &PathManager) -> Result<Config> {
    let config_file = path_manager.config_file();
    Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

fn load_credentials(path_manager: &PathManager) -> Result<CredentialStore> {
    let mut store = CredentialStore::new(path_manager.credentials_file());
    store.load().map_err(|e| eyre!("Failed to load credentials: {}", e))?;
    Ok(store)
}

/// Where the effective API key comes from, masked unless `full`.
fn api_key_display(credentials: &CredentialStore, full: bool) -> (String, &'static str) {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            return (if full { key } else { mask_string(&key) }, "environment");
        }
    }
    match credentials.get_omdb_api_key() {
        Some(key) => (if full { key.clone() } else { mask_string(key) }, "credentials file"),
        None => ("<not set>".to_string(), "-"),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let config = load_config(&path_manager)?;
    let credentials = load_credentials(&path_manager)?;
    let (api_key, api_key_source) = api_key_display(&credentials, full);

    if output.is_json() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "omdb": {
                "base_url": config.omdb.base_url,
                "timeout_seconds": config.omdb.timeout_seconds,
                "api_key": api_key,
                "api_key_source": api_key_source,
            },
            "search": { "min_query_len": config.search.min_query_len },
            "watchlist": {
                "storage_key": config.watchlist.storage_key,
                "max_rating": config.watchlist.max_rating,
                "storage_dir": path_manager.storage_dir().display().to_string(),
            },
            "display": { "default_title": config.display.default_title },
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("No config file at {}; showing defaults", config_file.display()));
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    let rows = [
        ("Config file", config_file.display().to_string()),
        ("OMDb base URL", config.omdb.base_url.clone()),
        ("OMDb timeout", format!("{}s", config.omdb.timeout_seconds)),
        ("OMDb API key", format!("{} ({})", api_key, api_key_source)),
        ("Min query length", config.search.min_query_len.to_string()),
        ("Max rating", config.watchlist.max_rating.to_string()),
        ("Storage key", config.watchlist.storage_key.clone()),
        ("Storage dir", path_manager.storage_dir().display().to_string()),
        ("Default title", config.display.default_title.clone()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);
    Ok(())
}

fn configure_omdb(api_key_arg: Option<String>, base_url: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let mut config = load_config(&path_manager)?;
    let mut credentials = load_credentials(&path_manager)?;

    if let Some(url) = base_url {
        config.omdb.base_url = url.trim().trim_end_matches('/').to_string();
        config
            .validate()
            .map_err(|e| eyre!("Invalid OMDb base URL: {}", e))?;
        config
            .save_to_file(&path_manager.config_file())
            .map_err(|e| eyre!("Failed to save config: {}", e))?;
        output.success(format!("OMDb base URL set to {}", config.omdb.base_url));
    }

    let api_key = match api_key_arg {
        Some(key) => key,
        None => {
            if credentials.get_omdb_api_key().is_some()
                && !prompts::prompt_yes_no("An OMDb API key is already stored. Replace it?", false)?
            {
                return Ok(());
            }
            if !output.is_json() {
                println!("{}", "Get a free key at https://www.omdbapi.com/apikey.aspx".bright_black());
            }
            prompts::prompt_password("OMDb API key")?
        }
    };

    let api_key = api_key.trim().to_string();
    if !validate_api_key(&api_key) {
        return Err(eyre!("Invalid OMDb API key: expected letters and digits only"));
    }

    credentials.set_omdb_api_key(api_key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;
    output.success(format!("OMDb API key saved to {}", credentials.path().display()));
    Ok(())
}

fn init_config(force: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = path_manager.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Config file already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
        return Ok(());
    }

    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write config: {}", e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

/// OMDb keys are short alphanumeric tokens.
fn validate_api_key(key: &str) -> bool {
    !key.is_empty() && key.len() <= 64 && key.chars().all(|c| c.is_ascii_alphanumeric())
}
