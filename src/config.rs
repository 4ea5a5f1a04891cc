//! Configuration for the zenblog CLI.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (ZENBLOG_BLOG_ID, ZENBLOG_API_URL, ZENBLOG_DEBUG,
//!    ZENBLOG_DASHBOARD_URL, ZENBLOG_DASHBOARD_TOKEN, SUPABASE_URL, SUPABASE_KEY)
//! 2. Config file (.zenblog/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .zenblog/config.yaml
//! - Falls back to ~/.zenblog/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::dashboard::DEFAULT_DASHBOARD_URL;
use crate::adapters::supabase::{DEFAULT_BUCKET, DEFAULT_TABLE};
use crate::sdk::{ClientOptions, DEFAULT_API_URL};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub blog_id: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub url: Option<String>,
    pub debug: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub key: Option<String>,
    pub bucket: Option<String>,
    pub table: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub blog_id: Option<String>,
    pub api_url: String,
    pub debug: bool,
    pub dashboard_url: String,
    pub dashboard_token: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub bucket: String,
    pub table: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// SDK options for a blog, falling back to the configured blog id
    pub fn client_options(&self, blog_id: Option<&str>) -> Result<ClientOptions> {
        let blog_id = blog_id
            .map(str::to_string)
            .or_else(|| self.blog_id.clone())
            .context("No blog id given. Pass --blog or set ZENBLOG_BLOG_ID")?;

        Ok(ClientOptions::new(blog_id)
            .with_url(self.api_url.clone())
            .with_debug(self.debug))
    }
}

/// Find config file by searching a directory and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".zenblog").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Merge file values, environment lookups and defaults
fn resolve(
    file: ConfigFile,
    config_file: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    ResolvedConfig {
        blog_id: env("ZENBLOG_BLOG_ID").or(file.blog_id),
        api_url: env("ZENBLOG_API_URL")
            .or(file.api.url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        debug: env("ZENBLOG_DEBUG")
            .map(|v| parse_bool(&v))
            .or(file.api.debug)
            .unwrap_or(false),
        dashboard_url: env("ZENBLOG_DASHBOARD_URL")
            .or(file.dashboard.url)
            .unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string()),
        dashboard_token: env("ZENBLOG_DASHBOARD_TOKEN").or(file.dashboard.token),
        supabase_url: env("SUPABASE_URL").or(file.supabase.url),
        supabase_key: env("SUPABASE_KEY").or(file.supabase.key),
        bucket: file
            .supabase
            .bucket
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        table: file
            .supabase
            .table
            .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
        config_file,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let user_config = user_config_path().ok().filter(|p| p.exists());
    load_config_from(&cwd, user_config, |name| std::env::var(name).ok())
}

fn load_config_from(
    start: &Path,
    fallback: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let config_file = find_config_file(start).or(fallback);
    let file = match &config_file {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    Ok(resolve(file, config_file, env))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Default location for a user-level config file (~/.zenblog/config.yaml)
pub fn user_config_path() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".zenblog")
        .join("config.yaml"))
}
