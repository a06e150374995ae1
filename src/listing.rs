//! Plain-text listings of installed and known commands.

use crate::catalog::{CategoryTable, CommandLists};
use std::io::{self, Write};
use std::path::Path;

/// Installed helpers, split by where they were found.
pub fn list_commands<W: Write>(
    out: &mut W,
    tool: &str,
    lists: &CommandLists,
    exec_path: Option<&Path>,
) -> io::Result<()> {
    if !lists.main.is_empty() {
        let location = exec_path
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();
        writeln!(out, "available {tool} commands in '{location}'")?;
        for name in lists.main.names() {
            writeln!(out, "  {name}")?;
        }
        writeln!(out)?;
    }

    if !lists.other.is_empty() {
        writeln!(out, "{tool} commands available from elsewhere on your $PATH")?;
        for name in lists.other.names() {
            writeln!(out, "  {name}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Every installed name, primary location first.
pub fn list_all_cmds<W: Write>(out: &mut W, lists: &CommandLists) -> io::Result<()> {
    for name in lists.main.names().chain(lists.other.names()) {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub fn list_porcelain_cmds<W: Write>(out: &mut W, table: &CategoryTable) -> io::Result<()> {
    for entry in table.porcelain() {
        writeln!(out, "{}", entry.name)?;
    }
    Ok(())
}

/// Common commands under their group headings, with one-line help.
pub fn list_common_cmds<W: Write>(out: &mut W, tool: &str, table: &CategoryTable) -> io::Result<()> {
    let common = table.common_by_group();
    let width = common.iter().map(|entry| entry.name.len()).max().unwrap_or(0);

    writeln!(out, "These are common {tool} commands used in various situations:")?;
    let mut current = None;
    for entry in common {
        if entry.group != current {
            current = entry.group;
            if let Some(group) = current {
                writeln!(out, "\n{}", group.heading())?;
            }
        }
        writeln!(out, "   {:<width$}   {}", entry.name, entry.help)?;
    }
    Ok(())
}
