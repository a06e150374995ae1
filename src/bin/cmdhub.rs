//! `cmdhub` dispatcher: runs `cmdhub-<name>` helpers and recovers from typos.
//!
//! Unknown names go through the suggestion engine, which either prints the
//! closest commands and exits 1 or (with autocorrect enabled) substitutes a
//! single close match and runs it instead.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use cmdhub::{
    ResolveContext, guess_refs, help_broken_helper, help_unknown_cmd, help_unknown_ref,
    listing::{list_all_cmds, list_commands, list_common_cmds, list_porcelain_cmds},
    refs::parse_ref_listing,
    runtime::{helper_file_name, resolve_helper},
};
use std::env;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CMDHUB_LOG";

#[derive(Parser)]
#[command(
    name = "cmdhub",
    version,
    about = "Run cmdhub-<command> helpers from the exec directory or PATH"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print the directory holding installed helpers and exit
    #[arg(long)]
    exec_path: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed or known commands
    List {
        /// Every installed name, one per line
        #[arg(long, conflicts_with_all = ["porcelain", "common"])]
        all: bool,
        /// Main porcelain from the command table
        #[arg(long, conflicts_with = "common")]
        porcelain: bool,
        /// Common commands grouped by workflow
        #[arg(long)]
        common: bool,
    },
    /// Explain an unknown ref using `<id> <refname>` lines read from stdin
    RefHint {
        /// The short ref that failed to resolve
        reference: String,
        /// Command name used in the report
        #[arg(long, default_value = "cmdhub")]
        cmd: String,
        /// Error text used in the report
        #[arg(long, default_value = "not a valid ref")]
        error: String,
    },
    /// Any other name runs the matching helper
    #[command(external_subcommand)]
    External(Vec<String>),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = ResolveContext::from_env()?;
    debug!(exec_path = ?ctx.exec_path, autocorrect = ?ctx.settings.autocorrect, "resolved context");

    if cli.exec_path {
        let Some(dir) = &ctx.exec_path else {
            bail!("Unable to locate the cmdhub exec directory");
        };
        println!("{}", dir.display());
        return Ok(());
    }

    match cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
            list_common_cmds(&mut io::stdout().lock(), &ctx.tool, &ctx.table)?;
            Ok(())
        }
        Some(Commands::List {
            all,
            porcelain,
            common,
        }) => {
            let mut out = io::stdout().lock();
            if porcelain {
                list_porcelain_cmds(&mut out, &ctx.table)?;
            } else if common {
                list_common_cmds(&mut out, &ctx.tool, &ctx.table)?;
            } else if all {
                list_all_cmds(&mut out, &ctx.command_lists())?;
            } else {
                list_commands(
                    &mut out,
                    &ctx.tool,
                    &ctx.command_lists(),
                    ctx.exec_path.as_deref(),
                )?;
            }
            out.flush()?;
            Ok(())
        }
        Some(Commands::RefHint {
            reference,
            cmd,
            error,
        }) => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read refs from stdin")?;
            let refs = parse_ref_listing(&input)?;
            let hints = guess_refs(&reference, &refs);
            help_unknown_ref(&mut io::stderr().lock(), &cmd, &reference, &error, &hints)?;
            std::process::exit(1);
        }
        Some(Commands::External(argv)) => run_external(&ctx, argv),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }),
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

/// Replace an alias with its expansion; expansion words precede `args`.
fn expand_alias(ctx: &ResolveContext, name: String, args: Vec<String>) -> (String, Vec<String>) {
    let Some(mut words) = ctx.settings.expand_alias(&name) else {
        return (name, args);
    };
    debug!(alias = %name, expansion = ?words, "expanding alias");
    let command = words.remove(0);
    words.extend(args);
    (command, words)
}

fn locate(ctx: &ResolveContext, name: &str) -> Option<PathBuf> {
    let file_name = helper_file_name(&ctx.prefix, name);
    resolve_helper(
        ctx.exec_path.as_deref(),
        ctx.search_path.as_deref(),
        &file_name,
    )
}

fn run_external(ctx: &ResolveContext, argv: Vec<String>) -> Result<()> {
    let mut argv = argv.into_iter();
    let Some(typed) = argv.next() else {
        bail!("No command given");
    };
    let (mut name, mut args) = expand_alias(ctx, typed, argv.collect());

    let helper = match locate(ctx, &name) {
        Some(path) => path,
        None => {
            let assumed = help_unknown_cmd(ctx, &name);
            info!(typed = %name, assumed = %assumed, "autocorrected command");
            (name, args) = expand_alias(ctx, assumed, args);
            match locate(ctx, &name) {
                Some(path) => path,
                None => bail!("Unable to locate helper for '{name}'"),
            }
        }
    };

    debug!(command = %name, helper = %helper.display(), "running helper");
    let status = match Command::new(&helper).args(&args).status() {
        Ok(status) => status,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // The file exists, so its interpreter is what went missing.
            help_broken_helper(ctx, &name);
            bail!("Failed to execute {}: {err}", helper.display());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to execute {}", helper.display()));
        }
    };

    if status.success() {
        return Ok(());
    }

    if let Some(code) = status.code() {
        std::process::exit(code);
    }

    bail!("Helper terminated by signal")
}
