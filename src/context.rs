//! Per-invocation state for command resolution.
//!
//! Everything the catalog scan and the suggestion engine need is gathered
//! here once: where helpers live, what they are called, the user settings,
//! and the category table. Nothing is cached between invocations.

use crate::catalog::{Catalog, CategoryTable, CommandLists, load_command_list};
use crate::config::Settings;
use crate::find_exec_path;
use anyhow::{Context, Result};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_TOOL_NAME: &str = "cmdhub";

#[derive(Clone, Debug)]
pub struct ResolveContext {
    /// Name used in diagnostics (`'<cmd>' is not a <tool> command`).
    pub tool: String,
    /// File-name prefix identifying helpers (`cmdhub-`).
    pub prefix: String,
    /// Primary install location.
    pub exec_path: Option<PathBuf>,
    /// Secondary locations, platform-separated.
    pub search_path: Option<OsString>,
    pub settings: Settings,
    pub table: CategoryTable,
}

impl ResolveContext {
    /// Context for `tool` with defaults and no discovered locations.
    pub fn new(tool: impl Into<String>) -> Self {
        let tool = tool.into();
        Self {
            prefix: format!("{tool}-"),
            tool,
            exec_path: None,
            search_path: None,
            settings: Settings::default(),
            table: CategoryTable::builtin(),
        }
    }

    /// Resolve locations, settings, and the category table from the environment.
    pub fn from_env() -> Result<Self> {
        let settings = Settings::from_env().context("loading configuration")?;
        let table = match &settings.command_table {
            Some(path) => CategoryTable::load(path)?,
            None => CategoryTable::builtin(),
        };
        Ok(Self {
            exec_path: find_exec_path().ok(),
            search_path: env::var_os("PATH"),
            settings,
            table,
            ..Self::new(DEFAULT_TOOL_NAME)
        })
    }

    /// Scan the exec directory and search path.
    pub fn command_lists(&self) -> CommandLists {
        load_command_list(
            &self.prefix,
            self.exec_path.as_deref(),
            self.search_path.as_deref(),
        )
    }

    /// Alias names as a catalog, ready to merge.
    pub fn alias_catalog(&self) -> Catalog {
        self.settings.alias_names().collect()
    }
}
