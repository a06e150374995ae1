//! Command resolution for the cmdhub dispatcher.
//!
//! `cmdhub <name>` runs an external helper called `cmdhub-<name>`. This crate
//! builds the catalog of installed helpers (the exec directory plus `PATH`),
//! and when a name resolves to nothing it ranks the catalog against what was
//! typed to suggest or autocorrect. The binaries depend on the functions
//! re-exported here: exec-path discovery, catalog loading, the suggestion
//! engine, and the listing and ref-hint printers.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod config;
pub mod context;
pub mod levenshtein;
pub mod listing;
pub mod refs;
pub mod runtime;
pub mod suggest;

pub use catalog::{
    Catalog, CategoryTable, CommandCategory, CommandGroup, CommandHelp, CommandLists,
    CommandName, list_commands_in_dir, load_command_list,
};
pub use config::{Autocorrect, Settings};
pub use context::ResolveContext;
pub use levenshtein::{COMMAND_WEIGHTS, EditWeights, levenshtein};
pub use refs::{RefRecord, guess_refs, help_unknown_ref};
pub use suggest::{
    Outcome, SIMILARITY_FLOOR, ScoredCommand, SuggestionEngine, UnknownCommand,
    help_broken_helper, help_unknown_cmd, similar_enough,
};

pub const EXEC_PATH_ENV: &str = "CMDHUB_EXEC_PATH";

/// Accepts `hint` only when it names an existing directory.
fn exec_path_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.is_dir() {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn exe_dir(exe_path: &Path) -> Option<PathBuf> {
    fs::canonicalize(exe_path.parent()?).ok()
}

/// Locate the primary helper directory.
///
/// `CMDHUB_EXEC_PATH` wins when it names a directory; otherwise helpers are
/// expected next to the running binary, then under the build-time hint.
pub fn find_exec_path() -> Result<PathBuf> {
    if let Ok(env_dir) = env::var(EXEC_PATH_ENV) {
        if let Some(dir) = exec_path_from_hint(&env_dir) {
            return Ok(dir);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(dir) = exe_dir(&exe_path) {
            return Ok(dir);
        }
    }

    if let Some(hint) = option_env!("CMDHUB_EXEC_PATH_HINT") {
        if let Some(dir) = exec_path_from_hint(hint) {
            return Ok(dir);
        }
    }

    bail!("Unable to locate the cmdhub exec directory. Set {EXEC_PATH_ENV} to the helper directory.");
}
