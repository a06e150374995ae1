//! Unknown-command suggestions and autocorrect.
//!
//! When dispatch finds no helper for a command, the engine ranks every known
//! command against the typed name and decides between four outcomes: the
//! command actually exists (so exec failed for another reason), the catalog
//! is empty, a single close match is substituted, or the closest matches are
//! listed and resolution fails.
//!
//! Scoring: a common command that starts with the typed name scores `0`.
//! Everything else scores its weighted edit distance plus one, so `0` stays
//! reserved for prefix matches. Ranked order is score, then name length, then
//! name.

use crate::catalog::{Catalog, CommandLists};
use crate::config::Autocorrect;
use crate::context::ResolveContext;
use crate::levenshtein::{COMMAND_WEIGHTS, levenshtein};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Scores below this are close enough to suggest.
pub const SIMILARITY_FLOOR: u32 = 7;

pub fn similar_enough(score: u32) -> bool {
    score < SIMILARITY_FLOOR
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoredCommand {
    pub name: String,
    pub score: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The typed name is a known command; running it failed for another reason.
    BadInterpreter,
    /// Substitute this command and carry on.
    AutoAccepted(String),
    /// Resolution failed; these are the closest names, best first (maybe none).
    Suggestions(Vec<String>),
    /// Nothing is installed at all.
    NoCommands,
}

/// Terminal diagnostics for an unresolved command.
#[derive(Debug, Error)]
pub enum UnknownCommand {
    #[error(
        "'{cmd}' appears to be a {tool} command, but we were not\nable to execute it. Maybe {prefix}{cmd} is broken?"
    )]
    BadInterpreter {
        tool: String,
        prefix: String,
        cmd: String,
    },
    #[error("Uh oh. Your system reports no {tool} commands at all.")]
    NoCommands { tool: String },
    #[error("{tool}: '{cmd}' is not a {tool} command. See '{tool} --help'.")]
    NotACommand {
        tool: String,
        cmd: String,
        suggestions: Vec<String>,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Merge primary, alias, and secondary names into one sorted, unique set.
pub fn merge_command_set(lists: CommandLists, mut aliases: Catalog) -> Catalog {
    let CommandLists {
        mut main,
        mut other,
    } = lists;
    main.append(&mut aliases);
    main.append(&mut other);
    main.normalize();
    main
}

pub struct SuggestionEngine {
    commands: Catalog,
    common: Vec<String>,
    autocorrect: Autocorrect,
}

impl SuggestionEngine {
    /// Build an engine over `commands`; `common` must be sorted by name.
    pub fn new(mut commands: Catalog, common: Vec<String>, autocorrect: Autocorrect) -> Self {
        commands.normalize();
        Self {
            commands,
            common,
            autocorrect,
        }
    }

    /// Scan, merge aliases, and pick up the common set from the context.
    pub fn from_context(ctx: &ResolveContext) -> Self {
        let commands = merge_command_set(ctx.command_lists(), ctx.alias_catalog());
        let common = ctx
            .table
            .common_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        Self::new(commands, common, ctx.settings.autocorrect)
    }

    pub fn commands(&self) -> &Catalog {
        &self.commands
    }

    /// Score every command against `typed`, best first.
    pub fn rank(&self, typed: &str) -> Vec<ScoredCommand> {
        let mut common = self.common.iter().peekable();
        let mut ranked: Vec<ScoredCommand> = self
            .commands
            .names()
            .map(|candidate| {
                while common.next_if(|name| name.as_str() < candidate).is_some() {}
                let is_common = common.next_if(|name| name.as_str() == candidate).is_some();
                let score = if is_common && candidate.starts_with(typed) {
                    0
                } else {
                    levenshtein(typed, candidate, COMMAND_WEIGHTS) + 1
                };
                ScoredCommand {
                    name: candidate.to_string(),
                    score,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.score
                .cmp(&b.score)
                .then_with(|| a.name.len().cmp(&b.name.len()))
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked
    }

    pub fn resolve_unknown(&self, typed: &str) -> Outcome {
        if self.commands.is_empty() {
            return Outcome::NoCommands;
        }
        if self.commands.contains(typed) {
            return Outcome::BadInterpreter;
        }

        let ranked = self.rank(typed);
        let selection = select(&ranked);
        debug!(
            typed,
            best = selection.best_similarity,
            unique = selection.unique,
            candidates = ?selection.candidates,
            "ranked unknown command"
        );

        if self.autocorrect.is_enabled() && selection.unique {
            return Outcome::AutoAccepted(ranked[0].name.clone());
        }
        Outcome::Suggestions(selection.candidates)
    }
}

struct Selection {
    best_similarity: u32,
    candidates: Vec<String>,
    unique: bool,
}

fn select(ranked: &[ScoredCommand]) -> Selection {
    let prefix_run = ranked.iter().take_while(|entry| entry.score == 0).count();

    // Prefix of everything: too ambiguous to suggest anything.
    let Some(closest) = ranked.get(prefix_run) else {
        return Selection {
            best_similarity: SIMILARITY_FLOOR + 1,
            candidates: Vec::new(),
            unique: false,
        };
    };

    let tier = ranked[prefix_run..]
        .iter()
        .take_while(|entry| entry.score == closest.score)
        .count();
    let best_similarity = closest.score;

    // The closest non-prefix tier gates the whole listing, prefix matches included.
    let candidates = if similar_enough(best_similarity) {
        ranked[..prefix_run + tier]
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    } else {
        Vec::new()
    };

    // A lone prefix match stands on its own zero score.
    let unique =
        prefix_run == 1 || (prefix_run == 0 && tier == 1 && similar_enough(best_similarity));

    Selection {
        best_similarity,
        candidates,
        unique,
    }
}

/// Blocking pause before an autocorrected command runs.
pub trait Pause {
    fn pause(&self, duration: Duration);
}

/// Sleeps the calling thread; only a process signal interrupts it.
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Write the diagnostics for `outcome`, pausing before an autocorrect.
///
/// Returns the substituted name, or the terminal condition.
pub fn report_unknown_cmd<W: Write, P: Pause>(
    ctx: &ResolveContext,
    typed: &str,
    outcome: Outcome,
    out: &mut W,
    pause: &P,
) -> Result<String, UnknownCommand> {
    let tool = ctx.tool.as_str();
    match outcome {
        Outcome::AutoAccepted(assumed) => {
            writeln!(
                out,
                "WARNING: You called a {tool} command named '{typed}', which does not exist."
            )?;
            match ctx.settings.autocorrect {
                Autocorrect::Delayed { tenths } => {
                    writeln!(
                        out,
                        "Continuing in {:.1} seconds, assuming that you meant '{assumed}'.",
                        f64::from(tenths) / 10.0
                    )?;
                    out.flush()?;
                    if let Some(delay) = ctx.settings.autocorrect.delay() {
                        pause.pause(delay);
                    }
                }
                Autocorrect::Immediate | Autocorrect::Off => {
                    writeln!(
                        out,
                        "Continuing under the assumption that you meant '{assumed}'."
                    )?;
                }
            }
            Ok(assumed)
        }
        Outcome::Suggestions(suggestions) => {
            let err = UnknownCommand::NotACommand {
                tool: tool.to_string(),
                cmd: typed.to_string(),
                suggestions: suggestions.clone(),
            };
            writeln!(out, "{err}")?;
            if !suggestions.is_empty() {
                let header = if suggestions.len() == 1 {
                    "The most similar command is"
                } else {
                    "The most similar commands are"
                };
                writeln!(out, "\n{header}")?;
                for name in &suggestions {
                    writeln!(out, "\t{name}")?;
                }
            }
            Err(err)
        }
        Outcome::BadInterpreter => {
            let err = UnknownCommand::BadInterpreter {
                tool: tool.to_string(),
                prefix: ctx.prefix.clone(),
                cmd: typed.to_string(),
            };
            writeln!(out, "fatal: {err}")?;
            Err(err)
        }
        Outcome::NoCommands => {
            let err = UnknownCommand::NoCommands {
                tool: tool.to_string(),
            };
            writeln!(out, "fatal: {err}")?;
            Err(err)
        }
    }
}

/// Resolve `typed` against the installed commands, printing to stderr.
///
/// Returns only when a substitute was accepted; every other outcome exits
/// the process with status 1.
pub fn help_unknown_cmd(ctx: &ResolveContext, typed: &str) -> String {
    let engine = SuggestionEngine::from_context(ctx);
    let outcome = engine.resolve_unknown(typed);
    let stderr = io::stderr();
    match report_unknown_cmd(ctx, typed, outcome, &mut stderr.lock(), &ThreadPause) {
        Ok(assumed) => assumed,
        Err(err) => {
            debug!(%err, "unknown command is terminal");
            std::process::exit(1);
        }
    }
}

/// Report a helper that was found but could not be spawned.
///
/// Only a cataloged name gets the broken-interpreter diagnostic; for any
/// other name nothing is written and `Ok` is returned.
pub fn report_broken_helper<W: Write>(
    ctx: &ResolveContext,
    engine: &SuggestionEngine,
    typed: &str,
    out: &mut W,
) -> Result<(), UnknownCommand> {
    if !engine.commands().contains(typed) {
        debug!(typed, "spawn failed for a helper outside the catalog");
        return Ok(());
    }
    report_unknown_cmd(ctx, typed, Outcome::BadInterpreter, out, &ThreadPause).map(drop)
}

/// Exits with status 1 when `typed` names a broken cataloged helper.
pub fn help_broken_helper(ctx: &ResolveContext, typed: &str) {
    let engine = SuggestionEngine::from_context(ctx);
    let stderr = io::stderr();
    if let Err(err) = report_broken_helper(ctx, &engine, typed, &mut stderr.lock()) {
        debug!(%err, "broken helper is terminal");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn engine(names: &[&str], common: &[&str], autocorrect: i32) -> SuggestionEngine {
        SuggestionEngine::new(
            names.iter().copied().collect(),
            common.iter().map(|name| name.to_string()).collect(),
            Autocorrect::from_setting(autocorrect),
        )
    }

    fn suggestions(names: &[&str]) -> Outcome {
        Outcome::Suggestions(names.iter().map(|name| name.to_string()).collect())
    }

    #[derive(Default)]
    struct RecordingPause(RefCell<Vec<Duration>>);

    impl Pause for RecordingPause {
        fn pause(&self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    fn context(autocorrect: i32) -> ResolveContext {
        let mut ctx = ResolveContext::new("cmdhub");
        ctx.settings.autocorrect = Autocorrect::from_setting(autocorrect);
        ctx
    }

    #[test]
    fn empty_catalog_wins_even_for_empty_input() {
        assert_eq!(engine(&[], &[], -1).resolve_unknown(""), Outcome::NoCommands);
        assert_eq!(engine(&[], &[], 0).resolve_unknown("status"), Outcome::NoCommands);
    }

    #[test]
    fn exact_name_is_bad_interpreter() {
        let engine = engine(&["fetch", "fetch-pack", "status"], &["fetch"], -1);
        assert_eq!(engine.resolve_unknown("fetch"), Outcome::BadInterpreter);
    }

    #[test]
    fn closest_command_is_suggested() {
        let engine = engine(&["status", "stash", "commit"], &[], 0);
        assert_eq!(engine.resolve_unknown("stats"), suggestions(&["status"]));

        let ranked = engine.rank("stats");
        assert_eq!(ranked[0], ScoredCommand { name: "status".into(), score: 2 });
        assert_eq!(ranked[1], ScoredCommand { name: "stash".into(), score: 5 });
        assert!(!similar_enough(ranked[2].score));
    }

    #[test]
    fn unique_prefix_of_common_command_autocorrects() {
        let engine = engine(&["checkout", "commit", "status"], &["checkout", "commit"], -1);
        assert_eq!(
            engine.resolve_unknown("check"),
            Outcome::AutoAccepted("checkout".into())
        );
    }

    #[test]
    fn prefix_bonus_outranks_smaller_edit_distance() {
        let engine = engine(&["stats", "status"], &["status"], 0);
        let ranked = engine.rank("stat");
        assert_eq!(ranked[0], ScoredCommand { name: "status".into(), score: 0 });
        assert_eq!(ranked[1], ScoredCommand { name: "stats".into(), score: 2 });
        assert_eq!(engine.resolve_unknown("stat"), suggestions(&["status", "stats"]));
    }

    #[test]
    fn prefix_bonus_needs_a_common_command() {
        let engine = engine(&["stash", "status"], &[], 0);
        assert!(engine.rank("sta").iter().all(|entry| entry.score > 0));
    }

    #[test]
    fn all_prefix_matches_suggest_nothing() {
        let engine = engine(&["checkout", "cherry"], &["checkout", "cherry"], -1);
        assert_eq!(engine.resolve_unknown("che"), suggestions(&[]));
        assert_eq!(engine.resolve_unknown(""), suggestions(&[]));

        let single = self::engine(&["checkout"], &["checkout"], -1);
        assert_eq!(single.resolve_unknown("check"), suggestions(&[]));
    }

    #[test]
    fn several_prefix_matches_refuse_autocorrect() {
        let engine = engine(
            &["checkout", "chef", "cherry", "status"],
            &["checkout", "cherry"],
            -1,
        );
        assert_eq!(
            engine.resolve_unknown("che"),
            suggestions(&["cherry", "checkout", "chef"])
        );
    }

    #[test]
    fn distant_closest_tier_hides_prefix_matches() {
        let engine = engine(
            &["checkout", "cherry", "zzzzzzzzzz"],
            &["checkout", "cherry"],
            0,
        );
        let ranked = engine.rank("che");
        assert_eq!(ranked[0].score, 0);
        assert_eq!(ranked[1].score, 0);
        assert!(!similar_enough(ranked[2].score));
        assert_eq!(engine.resolve_unknown("che"), suggestions(&[]));

        let status = self::engine(&["checkout", "cherry", "status"], &["checkout", "cherry"], -1);
        assert_eq!(status.resolve_unknown("che"), suggestions(&[]));
    }

    #[test]
    fn lone_prefix_match_lists_only_with_close_tier() {
        let engine = engine(&["checkout", "commit", "status"], &["checkout", "commit"], 0);
        assert_eq!(engine.resolve_unknown("check"), suggestions(&[]));

        let engine = self::engine(&["stats", "status"], &["status"], -1);
        assert_eq!(engine.resolve_unknown("stat"), Outcome::AutoAccepted("status".into()));
    }

    #[test]
    fn ties_refuse_autocorrect() {
        let engine = engine(&["push", "pass", "log"], &[], -1);
        assert_eq!(engine.resolve_unknown("pash"), suggestions(&["pass", "push"]));
    }

    #[test]
    fn distant_input_suggests_nothing() {
        let engine = engine(&["status", "commit"], &[], -1);
        assert_eq!(engine.resolve_unknown("xyzzyplugh"), suggestions(&[]));
    }

    #[test]
    fn rank_breaks_ties_by_length_then_name() {
        let engine = engine(&["bb", "a", "ab", "b"], &[], 0);
        let names: Vec<String> = engine.rank("").into_iter().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["a", "b", "ab", "bb"]);
    }

    #[test]
    fn merge_folds_aliases_and_other_locations() {
        let lists = CommandLists {
            main: ["add", "status"].into_iter().collect(),
            other: ["lfs"].into_iter().collect(),
        };
        let merged = merge_command_set(lists, ["co", "add"].into_iter().collect());
        assert_eq!(merged.names().collect::<Vec<_>>(), vec!["add", "co", "lfs", "status"]);
    }

    #[test]
    fn report_lists_suggestions() {
        let mut out = Vec::new();
        let err = report_unknown_cmd(
            &context(0),
            "pash",
            suggestions(&["pass", "push"]),
            &mut out,
            &RecordingPause::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UnknownCommand::NotACommand { .. }));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "cmdhub: 'pash' is not a cmdhub command. See 'cmdhub --help'.\n\
             \nThe most similar commands are\n\tpass\n\tpush\n"
        );
    }

    #[test]
    fn report_without_candidates_prints_only_the_error() {
        let mut out = Vec::new();
        report_unknown_cmd(
            &context(0),
            "zz",
            suggestions(&[]),
            &mut out,
            &RecordingPause::default(),
        )
        .unwrap_err();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "cmdhub: 'zz' is not a cmdhub command. See 'cmdhub --help'.\n"
        );
    }

    #[test]
    fn report_delayed_autocorrect_pauses() {
        let mut out = Vec::new();
        let pause = RecordingPause::default();
        let assumed = report_unknown_cmd(
            &context(15),
            "stats",
            Outcome::AutoAccepted("status".into()),
            &mut out,
            &pause,
        )
        .unwrap();
        assert_eq!(assumed, "status");
        assert_eq!(pause.0.borrow().as_slice(), &[Duration::from_millis(1500)]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "WARNING: You called a cmdhub command named 'stats', which does not exist.\n\
             Continuing in 1.5 seconds, assuming that you meant 'status'.\n"
        );
    }

    #[test]
    fn report_immediate_autocorrect_does_not_pause() {
        let mut out = Vec::new();
        let pause = RecordingPause::default();
        report_unknown_cmd(
            &context(-1),
            "stats",
            Outcome::AutoAccepted("status".into()),
            &mut out,
            &pause,
        )
        .unwrap();
        assert!(pause.0.borrow().is_empty());
        assert!(
            String::from_utf8(out)
                .unwrap()
                .ends_with("Continuing under the assumption that you meant 'status'.\n")
        );
    }

    #[test]
    fn report_bad_interpreter_names_the_helper() {
        let mut out = Vec::new();
        let err = report_unknown_cmd(
            &context(0),
            "fetch",
            Outcome::BadInterpreter,
            &mut out,
            &RecordingPause::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UnknownCommand::BadInterpreter { .. }));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "fatal: 'fetch' appears to be a cmdhub command, but we were not\n\
             able to execute it. Maybe cmdhub-fetch is broken?\n"
        );
    }

    #[test]
    fn broken_helper_outside_catalog_writes_nothing() {
        let ctx = context(-1);
        let engine = engine(&["broken", "status"], &[], -1);

        let mut out = Vec::new();
        report_broken_helper(&ctx, &engine, "brokn", &mut out).unwrap();
        assert!(out.is_empty());

        let mut out = Vec::new();
        let err = report_broken_helper(&ctx, &engine, "broken", &mut out).unwrap_err();
        assert!(matches!(err, UnknownCommand::BadInterpreter { .. }));
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("fatal: 'broken' appears to be a cmdhub command"));
        assert!(!text.contains("WARNING"));
    }
}
