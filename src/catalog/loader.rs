//! Directory scanning for installed helpers.
//!
//! Helpers are executables named `<prefix><command>` living either in the
//! exec directory (the primary install location) or anywhere on PATH. A
//! missing or unreadable directory is normal for PATH entries and is skipped
//! without error.

use crate::catalog::names::Catalog;
use crate::runtime::{is_executable, strip_exe_suffix};
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Commands split by provenance.
///
/// `other` never repeats a name found in `main`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandLists {
    pub main: Catalog,
    pub other: Catalog,
}

/// Add every `<prefix>*` executable in `dir` to `catalog`.
///
/// The catalog is left unsorted; callers normalize after the last scan.
pub fn list_commands_in_dir(catalog: &mut Catalog, dir: &Path, prefix: &str) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            trace!(dir = %dir.display(), %err, "skipping unreadable directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            trace!(dir = %dir.display(), "skipping non-UTF-8 entry");
            continue;
        };
        let Some(command) = file_name.strip_prefix(prefix) else {
            continue;
        };
        if !is_executable(&entry.path()) {
            trace!(file = file_name, "skipping non-executable helper");
            continue;
        }
        let command = strip_exe_suffix(command);
        if command.is_empty() {
            continue;
        }
        catalog.add(command);
    }
}

/// Build the primary and secondary command lists.
///
/// `exec_path` is scanned into `main`; every component of `search_path`
/// other than `exec_path` is scanned into `other`, which then drops every
/// name already present in `main`.
pub fn load_command_list(
    prefix: &str,
    exec_path: Option<&Path>,
    search_path: Option<&OsStr>,
) -> CommandLists {
    let mut lists = CommandLists::default();

    if let Some(exec_dir) = exec_path {
        list_commands_in_dir(&mut lists.main, exec_dir, prefix);
        lists.main.normalize();
    }

    if let Some(paths) = search_path {
        for dir in env::split_paths(paths) {
            if exec_path.is_some_and(|exec_dir| exec_dir == dir.as_path()) {
                continue;
            }
            list_commands_in_dir(&mut lists.other, &dir, prefix);
        }
        lists.other.normalize();
    }

    lists.other.exclude(&lists.main);
    debug!(
        main = lists.main.len(),
        other = lists.other.len(),
        "loaded command lists"
    );
    lists
}
