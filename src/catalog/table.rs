//! Category table: the read-only help metadata for known commands.
//!
//! The table classifies commands by category and, for the main porcelain,
//! by workflow group. The suggestion engine only asks one question of it:
//! which names are *common* (main porcelain with a group). A replacement
//! table can be loaded from JSON; it is validated against an embedded schema
//! before deserialization so a malformed file fails with every violation
//! listed at once.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    MainPorcelain,
    AncillaryManipulators,
    AncillaryInterrogators,
    ForeignScmInterface,
    PlumbingManipulators,
    PlumbingInterrogators,
    SynchingRepositories,
    PureHelpers,
}

/// Workflow group of a main porcelain command; declaration order is display order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandGroup {
    Init,
    Worktree,
    Info,
    History,
    Remote,
}

impl CommandGroup {
    pub fn heading(self) -> &'static str {
        match self {
            CommandGroup::Init => "start a working area",
            CommandGroup::Worktree => "work on the current change",
            CommandGroup::Info => "examine the history and state",
            CommandGroup::History => "grow, mark and tweak your common history",
            CommandGroup::Remote => "collaborate",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandHelp {
    pub name: String,
    pub help: String,
    pub category: CommandCategory,
    #[serde(default)]
    pub group: Option<CommandGroup>,
}

impl CommandHelp {
    /// Main porcelain that belongs to a workflow group.
    pub fn is_common(&self) -> bool {
        self.category == CommandCategory::MainPorcelain && self.group.is_some()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CategoryTable {
    entries: Vec<CommandHelp>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryTable {
    pub fn new(mut entries: Vec<CommandHelp>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    /// The table shipped with the binary.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|&(name, category, group, help)| CommandHelp {
                    name: name.to_string(),
                    help: help.to_string(),
                    category,
                    group,
                })
                .collect(),
        )
    }

    /// Load and validate a table from a JSON array on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening command table {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing command table {}", path.display()))?;
        validate_against_schema(&value)
            .with_context(|| format!("validating command table {}", path.display()))?;

        let entries: Vec<CommandHelp> = serde_json::from_value(value)
            .with_context(|| format!("decoding command table {}", path.display()))?;
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                bail!("command table {} contains an empty name", path.display());
            }
            if !seen.insert(entry.name.as_str()) {
                bail!(
                    "command table {} lists '{}' more than once",
                    path.display(),
                    entry.name
                );
            }
        }
        Ok(Self::new(entries))
    }

    /// Entries in name order.
    pub fn entries(&self) -> &[CommandHelp] {
        &self.entries
    }

    /// Names of the common commands, sorted.
    pub fn common_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.is_common())
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// Common commands ordered by group, then name.
    pub fn common_by_group(&self) -> Vec<&CommandHelp> {
        let mut common: Vec<&CommandHelp> =
            self.entries.iter().filter(|entry| entry.is_common()).collect();
        common.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.name.cmp(&b.name)));
        common
    }

    /// Every main porcelain command, grouped or not.
    pub fn porcelain(&self) -> impl Iterator<Item = &CommandHelp> {
        self.entries
            .iter()
            .filter(|entry| entry.category == CommandCategory::MainPorcelain)
    }
}

fn validate_against_schema(value: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(TABLE_SCHEMA).context("parsing embedded command table schema")?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling embedded command table schema: {err}"))?;
    if let Err(errors) = compiled.validate(value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("schema violations:\n{details}");
    }
    Ok(())
}

const TABLE_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "array",
  "items": {
    "type": "object",
    "required": ["name", "help", "category"],
    "additionalProperties": false,
    "properties": {
      "name": { "type": "string", "pattern": "^[A-Za-z0-9][A-Za-z0-9_.-]*$" },
      "help": { "type": "string" },
      "category": {
        "enum": [
          "mainporcelain",
          "ancillarymanipulators",
          "ancillaryinterrogators",
          "foreignscminterface",
          "plumbingmanipulators",
          "plumbinginterrogators",
          "synchingrepositories",
          "purehelpers"
        ]
      },
      "group": { "enum": ["init", "worktree", "info", "history", "remote", null] }
    }
  }
}"#;

use CommandCategory::*;
use CommandGroup::*;

const BUILTIN: &[(&str, CommandCategory, Option<CommandGroup>, &str)] = &[
    ("add", MainPorcelain, Some(Worktree), "Add file contents to the index"),
    ("am", MainPorcelain, None, "Apply a series of patches from a mailbox"),
    ("apply", PlumbingManipulators, None, "Apply a patch to files and/or to the index"),
    ("archive", MainPorcelain, None, "Create an archive of files from a named tree"),
    ("bisect", MainPorcelain, Some(Info), "Use binary search to find the change that introduced a bug"),
    ("blame", AncillaryInterrogators, None, "Show what revision and author last modified each line of a file"),
    ("branch", MainPorcelain, Some(History), "List, create, or delete branches"),
    ("cat-file", PlumbingInterrogators, None, "Provide content or type and size information for objects"),
    ("check-ignore", PureHelpers, None, "Debug ignore files"),
    ("checkout", MainPorcelain, Some(History), "Switch branches or restore working tree files"),
    ("cherry-pick", MainPorcelain, None, "Apply the changes introduced by some existing commits"),
    ("clean", MainPorcelain, None, "Remove untracked files from the working tree"),
    ("clone", MainPorcelain, Some(Init), "Clone a repository into a new directory"),
    ("commit", MainPorcelain, Some(History), "Record changes to the repository"),
    ("config", AncillaryManipulators, None, "Get and set repository or global options"),
    ("describe", MainPorcelain, None, "Give an object a human readable name based on an available ref"),
    ("diff", MainPorcelain, Some(History), "Show changes between commits, commit and working tree, etc"),
    ("fetch", MainPorcelain, Some(Remote), "Download objects and refs from another repository"),
    ("fetch-pack", SynchingRepositories, None, "Receive missing objects from another repository"),
    ("format-patch", MainPorcelain, None, "Prepare patches for e-mail submission"),
    ("fsck", AncillaryInterrogators, None, "Verify the connectivity and validity of the objects in the database"),
    ("gc", MainPorcelain, None, "Cleanup unnecessary files and optimize the local repository"),
    ("grep", MainPorcelain, Some(Info), "Print lines matching a pattern"),
    ("help", AncillaryInterrogators, None, "Display help information"),
    ("init", MainPorcelain, Some(Init), "Create an empty repository or reinitialize an existing one"),
    ("log", MainPorcelain, Some(Info), "Show commit logs"),
    ("ls-files", PlumbingInterrogators, None, "Show information about files in the index and the working tree"),
    ("merge", MainPorcelain, Some(History), "Join two or more development histories together"),
    ("mv", MainPorcelain, Some(Worktree), "Move or rename a file, a directory, or a symlink"),
    ("notes", MainPorcelain, None, "Add or inspect object notes"),
    ("pull", MainPorcelain, Some(Remote), "Fetch from and integrate with another repository or a local branch"),
    ("push", MainPorcelain, Some(Remote), "Update remote refs along with associated objects"),
    ("rebase", MainPorcelain, Some(History), "Reapply commits on top of another base tip"),
    ("reflog", AncillaryManipulators, None, "Manage reflog information"),
    ("remote", AncillaryManipulators, None, "Manage set of tracked repositories"),
    ("repack", AncillaryManipulators, None, "Pack unpacked objects in a repository"),
    ("reset", MainPorcelain, Some(Worktree), "Reset current HEAD to the specified state"),
    ("rev-parse", PlumbingInterrogators, None, "Pick out and massage parameters"),
    ("revert", MainPorcelain, None, "Revert some existing commits"),
    ("rm", MainPorcelain, Some(Worktree), "Remove files from the working tree and from the index"),
    ("send-email", ForeignScmInterface, None, "Send a collection of patches as emails"),
    ("send-pack", SynchingRepositories, None, "Push objects over a native protocol to another repository"),
    ("shortlog", MainPorcelain, None, "Summarize log output"),
    ("show", MainPorcelain, Some(Info), "Show various types of objects"),
    ("show-ref", PlumbingInterrogators, None, "List references in a local repository"),
    ("stash", MainPorcelain, None, "Stash the changes in a dirty working directory away"),
    ("status", MainPorcelain, Some(Info), "Show the working tree status"),
    ("stripspace", PureHelpers, None, "Remove unnecessary whitespace"),
    ("submodule", MainPorcelain, None, "Initialize, update or inspect submodules"),
    ("svn", ForeignScmInterface, None, "Bidirectional operation between a Subversion repository and this tool"),
    ("tag", MainPorcelain, Some(History), "Create, list, delete or verify a tag object"),
    ("update-index", PlumbingManipulators, None, "Register file contents in the working tree to the index"),
    ("update-ref", PlumbingManipulators, None, "Update the object name stored in a ref safely"),
    ("worktree", MainPorcelain, None, "Manage multiple working trees"),
    ("write-tree", PlumbingManipulators, None, "Create a tree object from the current index"),
];
