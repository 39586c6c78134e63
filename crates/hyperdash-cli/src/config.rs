// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use hyperdash_app::Route;
use hyperdash_data::WorkspaceCounts;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "hyperdash";
const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_LLM_BASE_URL: &str = "http://localhost:8080/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub llm: Llm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            data: Data::default(),
            llm: Llm::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub default_route: Option<String>,
    pub page_size: Option<i64>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            default_route: Some("/".to_owned()),
            page_size: Some(DEFAULT_PAGE_SIZE as i64),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    pub seed: Option<i64>,
    pub contacts: Option<i64>,
    pub companies: Option<i64>,
    pub admin_users: Option<i64>,
    pub history_events: Option<i64>,
}

impl Default for Data {
    fn default() -> Self {
        let counts = WorkspaceCounts::default();
        Self {
            seed: Some(DEFAULT_SEED as i64),
            contacts: Some(counts.contacts as i64),
            companies: Some(counts.companies as i64),
            admin_users: Some(counts.admin_users as i64),
            history_events: Some(counts.history_events as i64),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Llm {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub extra_context: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Llm {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            base_url: Some(DEFAULT_LLM_BASE_URL.to_owned()),
            model: Some(DEFAULT_LLM_MODEL.to_owned()),
            api_key: None,
            extra_context: Some(String::new()),
            timeout: Some("5s".to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("HYPERDASH_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set HYPERDASH_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [ui], [data], and [llm]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(route) = &self.ui.default_route
            && Route::from_path(route).is_none()
        {
            bail!(
                "ui.default_route in {} is {:?}; use a known route path such as \"/\" or \"/contacts\"",
                path.display(),
                route
            );
        }

        if let Some(page_size) = self.ui.page_size
            && page_size <= 0
        {
            bail!(
                "ui.page_size in {} must be positive, got {}",
                path.display(),
                page_size
            );
        }

        for (name, value) in [
            ("data.seed", self.data.seed),
            ("data.contacts", self.data.contacts),
            ("data.companies", self.data.companies),
            ("data.admin_users", self.data.admin_users),
            ("data.history_events", self.data.history_events),
        ] {
            if let Some(value) = value
                && value < 0
            {
                bail!(
                    "{name} in {} must be non-negative, got {value}",
                    path.display()
                );
            }
        }

        if let Some(timeout) = &self.llm.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "llm.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        Ok(())
    }

    pub fn default_route(&self) -> Route {
        self.ui
            .default_route
            .as_deref()
            .and_then(Route::from_path)
            .unwrap_or(Route::Dashboard)
    }

    pub fn page_size(&self) -> usize {
        self.ui
            .page_size
            .map(|size| size as usize)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn seed(&self) -> u64 {
        self.data.seed.map(|seed| seed as u64).unwrap_or(DEFAULT_SEED)
    }

    pub fn counts(&self) -> WorkspaceCounts {
        let defaults = WorkspaceCounts::default();
        WorkspaceCounts {
            contacts: self
                .data
                .contacts
                .map(|n| n as usize)
                .unwrap_or(defaults.contacts),
            companies: self
                .data
                .companies
                .map(|n| n as usize)
                .unwrap_or(defaults.companies),
            admin_users: self
                .data
                .admin_users
                .map(|n| n as usize)
                .unwrap_or(defaults.admin_users),
            history_events: self
                .data
                .history_events
                .map(|n| n as usize)
                .unwrap_or(defaults.history_events),
        }
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.enabled.unwrap_or(true)
    }

    pub fn llm_base_url(&self) -> &str {
        self.llm
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_LLM_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn llm_model(&self) -> &str {
        self.llm.model.as_deref().unwrap_or(DEFAULT_LLM_MODEL)
    }

    pub fn llm_api_key(&self) -> Option<&str> {
        self.llm
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn llm_timeout(&self) -> Result<Duration> {
        parse_duration(self.llm.timeout.as_deref().unwrap_or("5s"))
    }

    pub fn llm_extra_context(&self) -> &str {
        self.llm.extra_context.as_deref().unwrap_or("")
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# hyperdash config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# Any route path; see `?` in the app for the list\ndefault_route = \"/\"\npage_size = {}\n\n[data]\nseed = {}\ncontacts = 120\ncompanies = 45\nadmin_users = 18\nhistory_events = 80\n\n[llm]\nenabled = true\nbase_url = \"{}\"\nmodel = \"{}\"\n# api_key = \"sk-...\"\nextra_context = \"\"\ntimeout = \"5s\"\n",
            path.display(),
            DEFAULT_PAGE_SIZE,
            DEFAULT_SEED,
            DEFAULT_LLM_BASE_URL,
            DEFAULT_LLM_MODEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
