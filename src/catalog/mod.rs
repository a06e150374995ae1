//! Command catalog wiring.
//!
//! `names` holds the sorted, deduplicated name lists and their set
//! operations; `loader` fills them from the exec directory and PATH; `table`
//! is the read-only category table that marks common commands. Callers use
//! `load_command_list` to get the primary/secondary split and `Catalog` for
//! every merge performed afterwards.

pub mod loader;
pub mod names;
pub mod table;

pub use loader::{CommandLists, list_commands_in_dir, load_command_list};
pub use names::{Catalog, CommandName};
pub use table::{CategoryTable, CommandCategory, CommandGroup, CommandHelp};
