//! Runtime helpers shared by the catalog scanner and the dispatcher.
//!
//! Centralizes executable detection, the platform executable suffix, and
//! PATH resolution so command discovery and command dispatch agree on what
//! counts as an installed helper.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Suffix stripped from helper names on platforms that carry one.
pub const EXE_SUFFIX: &str = ".exe";

/// Returns true when a file exists and has any execute bit set.
pub fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = std::fs::metadata(path) {
            return meta.permissions().mode() & 0o111 != 0;
        }
        false
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Drop a trailing `.exe` from a helper file name, if present.
pub fn strip_exe_suffix(name: &str) -> &str {
    name.strip_suffix(EXE_SUFFIX).unwrap_or(name)
}

/// Helper file name for `command` under `prefix` (e.g. `cmdhub-status`).
pub fn helper_file_name(prefix: &str, command: &str) -> String {
    format!("{prefix}{command}")
}

/// Helper search order for one command.
///
/// The exec directory wins over PATH so an installed helper shadows a
/// same-named program elsewhere. Each location is tried with and without the
/// executable suffix.
pub fn helper_candidates(
    exec_path: Option<&Path>,
    search_path: Option<&OsStr>,
    file_name: &str,
) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Some(dir) = exec_path {
        dirs.push(dir.to_path_buf());
    }
    if let Some(paths) = search_path {
        dirs.extend(env::split_paths(paths));
    }

    let mut candidates = Vec::with_capacity(dirs.len() * 2);
    for dir in dirs {
        if dir.as_os_str().is_empty() {
            continue;
        }
        candidates.push(dir.join(file_name));
        candidates.push(dir.join(format!("{file_name}{EXE_SUFFIX}")));
    }
    candidates
}

/// Resolve the first executable helper in the search order.
pub fn resolve_helper(
    exec_path: Option<&Path>,
    search_path: Option<&OsStr>,
    file_name: &str,
) -> Option<PathBuf> {
    helper_candidates(exec_path, search_path, file_name)
        .into_iter()
        .find(|candidate| is_executable(candidate))
}
