//! User configuration consumed by command resolution.
//!
//! Only two settings matter here: `help.autocorrect` and the alias names.
//! Both come from a small JSON document located via `CMDHUB_CONFIG` (or the
//! platform config directory), and `CMDHUB_AUTOCORRECT` overrides the
//! autocorrect value so scripts can opt in or out without touching files.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_ENV: &str = "CMDHUB_CONFIG";
pub const AUTOCORRECT_ENV: &str = "CMDHUB_AUTOCORRECT";

/// On-disk shape of the config file. Every section is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub help: HelpSection,
    /// Alias name to its expansion (`"co": "checkout"`).
    pub alias: BTreeMap<String, String>,
    /// Replacement category table.
    pub command_table: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct HelpSection {
    pub autocorrect: i32,
}

/// Autocorrect policy decoded from the signed `help.autocorrect` integer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Autocorrect {
    /// `0`: never substitute.
    #[default]
    Off,
    /// Negative: substitute without waiting.
    Immediate,
    /// Positive: wait this many tenths of a second, then substitute.
    Delayed { tenths: u32 },
}

impl Autocorrect {
    pub fn from_setting(value: i32) -> Self {
        match value {
            0 => Autocorrect::Off,
            v if v < 0 => Autocorrect::Immediate,
            v => Autocorrect::Delayed {
                tenths: v.unsigned_abs(),
            },
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Autocorrect::Off
    }

    /// Pause before running the substituted command, if any.
    pub fn delay(self) -> Option<Duration> {
        match self {
            Autocorrect::Delayed { tenths } => Some(Duration::from_millis(u64::from(tenths) * 100)),
            Autocorrect::Off | Autocorrect::Immediate => None,
        }
    }
}

/// Resolved settings for one invocation.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    pub autocorrect: Autocorrect,
    pub aliases: BTreeMap<String, String>,
    pub command_table: Option<PathBuf>,
}

impl Settings {
    /// Load from the environment: config file, then `CMDHUB_AUTOCORRECT`.
    pub fn from_env() -> Result<Self> {
        let config_path = env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(default_config_path);
        let override_value = env::var(AUTOCORRECT_ENV).ok();
        Self::load(config_path.as_deref(), override_value.as_deref())
    }

    /// Load from an explicit config path and optional autocorrect override.
    ///
    /// A missing config file yields defaults; an unreadable or malformed one
    /// is an error.
    pub fn load(config_path: Option<&Path>, autocorrect_override: Option<&str>) -> Result<Self> {
        let file = match config_path {
            Some(path) => read_config_file(path)?,
            None => ConfigFile::default(),
        };

        let mut autocorrect = file.help.autocorrect;
        if let Some(raw) = autocorrect_override.map(str::trim).filter(|raw| !raw.is_empty()) {
            autocorrect = raw
                .parse()
                .with_context(|| format!("{AUTOCORRECT_ENV} must be an integer, got '{raw}'"))?;
        }

        let command_table = match (file.command_table, config_path.and_then(Path::parent)) {
            (Some(table), Some(base)) if table.is_relative() => Some(base.join(table)),
            (table, _) => table,
        };

        Ok(Self {
            autocorrect: Autocorrect::from_setting(autocorrect),
            aliases: file.alias,
            command_table,
        })
    }

    /// Alias names, in name order.
    pub fn alias_names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    /// Split an alias expansion into words, or `None` when `name` is no alias.
    pub fn expand_alias(&self, name: &str) -> Option<Vec<String>> {
        let expansion = self.aliases.get(name)?;
        let words: Vec<String> = expansion.split_whitespace().map(str::to_string).collect();
        if words.is_empty() { None } else { Some(words) }
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cmdhub").map(|dirs| dirs.config_dir().join("config.json"))
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(ConfigFile::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };
    serde_json::from_str(&data).with_context(|| format!("parsing config {}", path.display()))
}
